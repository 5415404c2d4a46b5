//! Convenience macros resolving the caller's namespace with `module_path!()`

/// Create a channel for the calling module, optionally with a label.
///
/// ```
/// let registry = channels::ChannelRegistry::new();
/// let handle = channels::channel!(registry, "io");
/// assert_eq!(handle.topic(), &format!("{}::io", module_path!()));
/// ```
#[macro_export]
macro_rules! channel {
    ($registry:expr) => {
        $registry.create_channel(::std::module_path!(), ::std::option::Option::None)
    };
    ($registry:expr, $label:expr) => {
        $registry.create_channel(::std::module_path!(), ::std::option::Option::Some($label))
    };
}

/// Emit fragments on a channel handle.
#[macro_export]
macro_rules! emit {
    ($handle:expr, $($fragment:expr),+ $(,)?) => {
        $handle.emit([$(&$fragment as &dyn ::std::fmt::Display),+])
    };
}

/// Emit fragments on the implicit channel of the calling module.
#[macro_export]
macro_rules! note {
    ($registry:expr, $($fragment:expr),+ $(,)?) => {
        $registry.log(
            ::std::module_path!(),
            [$(&$fragment as &dyn ::std::fmt::Display),+],
        )
    };
}
