//! Emission macros

/// Space-joined record: `debug_print!(logger, "a", b)`.
///
/// `debug_print!(logger, depth = 1; "a", b)` attributes the record one
/// frame further up.
#[macro_export]
macro_rules! debug_print {
    ($logger:expr, depth = $depth:expr; $($arg:expr),* $(,)?) => {
        $logger.print_depth($depth, &[$(&$arg as &dyn ::std::fmt::Display),*])
    };
    ($logger:expr $(, $arg:expr)* $(,)?) => {
        $logger.print(&[$(&$arg as &dyn ::std::fmt::Display),*])
    };
}

/// Space-joined, newline-terminated record.
#[macro_export]
macro_rules! debug_println {
    ($logger:expr $(, $arg:expr)* $(,)?) => {
        $logger.println(&[$(&$arg as &dyn ::std::fmt::Display),*])
    };
}

/// Format-string record: `debug_printf!(logger, "{} of {}", a, b)`.
#[macro_export]
macro_rules! debug_printf {
    ($logger:expr, $($arg:tt)+) => {
        $logger.printf(::std::format_args!($($arg)+))
    };
}

#[cfg(test)]
mod tests {
    use crate::{DebugLogger, Destination, Flags, Options, SharedBuffer};

    #[test]
    fn test_macros() {
        let buf = SharedBuffer::new();
        let logger = DebugLogger::new();
        logger.enable(Options::with_flags(Flags::empty()), [Destination::from(buf.clone())]);

        let n = 42;
        debug_print!(logger, "answer", n);
        debug_print!(&logger, depth = 0; "depth", n,);
        debug_println!(logger, "line", n);
        debug_printf!(logger, "fmt {n:>4}");
        debug_print!(logger);

        assert_eq!(
            buf.lines(),
            vec![
                "DEBUG: answer 42",
                "DEBUG: depth 42",
                "DEBUG: line 42",
                "DEBUG: fmt   42",
                "DEBUG: ",
            ]
        );
    }

    #[test]
    fn test_macro_call_site() {
        let buf = SharedBuffer::new();
        let logger = DebugLogger::new();
        logger.enable(Options::with_flags(Flags::SHORT_FILE), [Destination::from(buf.clone())]);

        let line = line!() + 1;
        debug_printf!(logger, "at {}", "site");

        assert_eq!(buf.contents(), format!("DEBUG: macros.rs:{}: at site\n", line));
    }
}
