//! Source location attribution for records

use std::borrow::Cow;
use std::panic::Location;
use std::path::Path;

/// File and line a record is attributed to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallSite {
    file: Cow<'static, str>,
    line: u32,
}

impl CallSite {
    /// Location of the code that called a `#[track_caller]` entry point
    pub fn from_location(location: &'static Location<'static>) -> Self {
        Self {
            file: Cow::Borrowed(location.file()),
            line: location.line(),
        }
    }

    /// Resolve the site `depth` frames above `anchor`.
    ///
    /// `anchor` is the tracked caller of the emission entry point. Depth 0
    /// returns it unchanged; otherwise the current stack is captured and
    /// walked upwards from the anchor frame. Falls back to `anchor` when
    /// the frame cannot be found or has no debug info.
    pub fn resolve(anchor: &'static Location<'static>, depth: usize) -> Self {
        if depth == 0 {
            return Self::from_location(anchor);
        }

        match walk_from_anchor(anchor, depth) {
            Some(site) => site,
            None => {
                tracing::trace!(depth, file = anchor.file(), line = anchor.line(), "call site not resolvable, using caller");
                Self::from_location(anchor)
            }
        }
    }

    /// Full path as recorded
    pub fn file(&self) -> &str {
        &self.file
    }

    /// Line number
    pub fn line(&self) -> u32 {
        self.line
    }

    /// Final path element
    pub fn short_file(&self) -> &str {
        self.file
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(self.file())
    }
}

fn walk_from_anchor(anchor: &'static Location<'static>, depth: usize) -> Option<CallSite> {
    let trace = backtrace::Backtrace::new();

    // Inlined functions show up as extra symbols of one frame, so flatten.
    let sites: Vec<CallSite> = trace
        .frames()
        .iter()
        .flat_map(|frame| frame.symbols())
        .filter_map(|symbol| {
            let file = symbol.filename()?;
            let line = symbol.lineno()?;
            Some(CallSite {
                file: Cow::Owned(file.to_string_lossy().into_owned()),
                line,
            })
        })
        .collect();

    let anchor_file = Path::new(anchor.file());
    let anchor_idx = sites
        .iter()
        .position(|site| site.line == anchor.line() && Path::new(site.file()).ends_with(anchor_file))?;

    // Debug info carries absolute paths; rebase onto the root the anchor's
    // relative path was taken from so every depth prints the same form.
    let root = Path::new(sites[anchor_idx].file())
        .ancestors()
        .nth(anchor_file.components().count())
        .map(Path::to_path_buf);

    let mut site = sites.into_iter().nth(anchor_idx + depth)?;
    let rebased = root
        .as_deref()
        .and_then(|root| Path::new(site.file()).strip_prefix(root).ok())
        .map(|relative| relative.to_string_lossy().into_owned());
    if let Some(relative) = rebased {
        site.file = Cow::Owned(relative);
    }
    Some(site)
}
