//! Logging front-end.
//!
//! With the `defmt` feature the macros are `defmt`'s own; without it they
//! compile to nothing so the library builds and tests on the host.

cfg_if::cfg_if! {
    if #[cfg(feature = "defmt")] {
        pub(crate) use defmt::{debug, info, warn};
    } else {
        // Named apart from the built-in `warn` lint attribute, renamed on re-export
        macro_rules! log_debug {
            ($fmt:literal $(, $arg:expr)* $(,)?) => {{ $( let _ = &$arg; )* }};
        }
        macro_rules! log_info {
            ($fmt:literal $(, $arg:expr)* $(,)?) => {{ $( let _ = &$arg; )* }};
        }
        macro_rules! log_warn {
            ($fmt:literal $(, $arg:expr)* $(,)?) => {{ $( let _ = &$arg; )* }};
        }
        pub(crate) use {log_debug as debug, log_info as info, log_warn as warn};
    }
}
