/// Forwards to `defmt` on firmware builds and to `log` on hosted builds.
macro_rules! viz_log {
    ($level:ident, $($arg:tt)*) => {{
        #[cfg(feature = "logging")]
        defmt::$level!($($arg)*);
        #[cfg(feature = "std")]
        log::$level!($($arg)*);
    }};
}
