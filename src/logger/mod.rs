//! The toggleable debug logger

pub mod call_site;
pub mod flags;
pub mod record;
pub mod sink;

pub use call_site::CallSite;
pub use flags::Flags;
pub use record::{Message, Style, TAG};
pub use sink::{Destination, SharedBuffer, SharedWriter};

use sink::FanOut;

use chrono::Utc;
use std::fmt::{self, Display};
use std::panic::Location;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, trace};

/// Options for enabling the logger
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Options {
    /// Metadata fields; `None` selects [`Flags::DEFAULT`]
    pub flags: Option<Flags>,
    /// Always include the default destination alongside explicit ones
    pub verbose: bool,
}

impl Options {
    /// Options with explicit flags
    pub fn with_flags(flags: Flags) -> Self {
        Self {
            flags: Some(flags),
            ..Default::default()
        }
    }

    /// Set verbose mode
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    fn effective_flags(&self) -> Flags {
        self.flags.unwrap_or(Flags::DEFAULT)
    }
}

struct LoggerState {
    enabled: bool,
    flags: Flags,
    sink: Option<FanOut>,
}

/// Process-wide debug logger, held by the host and shared by reference.
///
/// Starts disabled. While disabled every emission is a no-op that costs a
/// single atomic load. Reconfiguration and emission serialize on one lock,
/// so a record is always written with a complete configuration. Call-site
/// resolution and message formatting happen before the lock is taken.
pub struct DebugLogger {
    enabled: AtomicBool,
    flags: AtomicU32,
    state: Mutex<LoggerState>,
    default_destination: Destination,
}

impl DebugLogger {
    /// Disabled logger falling back to standard output
    pub fn new() -> Self {
        Self::with_default_destination(Destination::Stdout)
    }

    /// Disabled logger falling back to `destination` instead of stdout
    pub fn with_default_destination(destination: Destination) -> Self {
        Self {
            enabled: AtomicBool::new(false),
            flags: AtomicU32::new(Flags::DEFAULT.bits()),
            state: Mutex::new(LoggerState {
                enabled: false,
                flags: Flags::DEFAULT,
                sink: None,
            }),
            default_destination: destination,
        }
    }

    fn lock(&self) -> MutexGuard<'_, LoggerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Turn the logger on or off.
    ///
    /// Enabling builds a fresh fan-out over the non-`None` destinations.
    /// With none left, or with `verbose`, the default destination is put
    /// first. Disabling ignores `destinations` and leaves the old sink in
    /// place; it is never written while disabled.
    pub fn reconfigure<I, D>(&self, enable: bool, options: Options, destinations: I)
    where
        I: IntoIterator<Item = D>,
        D: Into<Option<Destination>>,
    {
        let mut state = self.lock();

        if enable {
            let mut resolved: Vec<Destination> = destinations.into_iter().filter_map(Into::<Option<Destination>>::into).collect();
            if resolved.is_empty() || options.verbose {
                resolved.insert(0, self.default_destination.clone());
            }

            debug!(
                destinations = resolved.len(),
                flags = %options.effective_flags(),
                verbose = options.verbose,
                "debug logger enabled"
            );

            state.flags = options.effective_flags();
            self.flags.store(state.flags.bits(), Ordering::Release);
            state.sink = Some(FanOut::new(resolved));
        } else if state.enabled {
            debug!("debug logger disabled");
        }

        // Flag goes last so nobody sees it set without the new sink.
        state.enabled = enable;
        self.enabled.store(enable, Ordering::Release);
    }

    /// Enable with the given destinations
    pub fn enable<I, D>(&self, options: Options, destinations: I)
    where
        I: IntoIterator<Item = D>,
        D: Into<Option<Destination>>,
    {
        self.reconfigure(true, options, destinations);
    }

    /// Disable; the current sink is kept but never written
    pub fn disable(&self) {
        self.reconfigure(false, Options::default(), std::iter::empty::<Destination>());
    }

    /// Current state of the toggle
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }

    /// Emit one record attributed `depth` frames above the caller.
    ///
    /// Write failures are swallowed.
    #[track_caller]
    pub fn emit(&self, depth: usize, message: Message<'_>) {
        if !self.is_enabled() {
            return;
        }
        let caller = Location::caller();
        self.write(caller, depth, message);
    }

    fn write(&self, caller: &'static Location<'static>, depth: usize, message: Message<'_>) {
        // Stack walks can be slow; keep them out of the critical section.
        let hinted = Flags::from_bits_truncate(self.flags.load(Ordering::Acquire));
        let mut site = hinted.wants_file().then(|| CallSite::resolve(caller, depth));
        let body = message.render();

        let state = self.lock();
        // Re-check under the lock: a disable may have raced the fast path.
        if !state.enabled {
            return;
        }
        let Some(sink) = state.sink.as_ref() else {
            return;
        };

        let flags = state.flags;
        if flags.wants_file() && site.is_none() {
            // Flags changed after the hint; the direct caller is always known.
            site = Some(CallSite::from_location(caller));
        }
        let record = record::render_record(flags, Utc::now(), site.as_ref(), &body);

        if let Err(e) = sink.write_record(&record) {
            trace!(error = %e, "dropped debug record");
        }
    }

    /// Operands joined with spaces
    #[track_caller]
    pub fn print(&self, args: &[&dyn Display]) {
        self.emit(0, Message::Concat(args));
    }

    /// Like [`print`](Self::print), attributed `depth` frames further up
    #[track_caller]
    pub fn print_depth(&self, depth: usize, args: &[&dyn Display]) {
        self.emit(depth, Message::Concat(args));
    }

    /// Operands joined with spaces, newline terminated
    #[track_caller]
    pub fn println(&self, args: &[&dyn Display]) {
        self.emit(0, Message::ConcatLine(args));
    }

    /// Format-string message, usually via `format_args!`
    #[track_caller]
    pub fn printf(&self, args: fmt::Arguments<'_>) {
        self.emit(0, Message::Template(args));
    }
}

impl Default for DebugLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for DebugLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DebugLogger")
            .field("enabled", &self.is_enabled())
            .field("default_destination", &self.default_destination)
            .finish()
    }
}
