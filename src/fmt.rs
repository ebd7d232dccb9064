//! Logging shim
//!
//! Forwards to `defmt` on firmware builds and to the `log` facade on host
//! builds. With neither feature enabled the arguments are evaluated and
//! discarded.

#![macro_use]
#![allow(unused_macros)]

macro_rules! log_dispatch {
    ($level:ident, $s:literal $(, $x:expr)* $(,)?) => {
        {
            #[cfg(feature = "defmt")]
            ::defmt::$level!($s $(, $x)*);
            #[cfg(all(feature = "log", not(feature = "defmt")))]
            ::log::$level!($s $(, $x)*);
            #[cfg(not(any(feature = "log", feature = "defmt")))]
            let _ = ($( & $x ),*);
        }
    };
}

macro_rules! trace {
    ($($t:tt)*) => { log_dispatch!(trace, $($t)*) };
}

macro_rules! debug {
    ($($t:tt)*) => { log_dispatch!(debug, $($t)*) };
}

macro_rules! info {
    ($($t:tt)*) => { log_dispatch!(info, $($t)*) };
}

macro_rules! warn {
    ($($t:tt)*) => { log_dispatch!(warn, $($t)*) };
}
