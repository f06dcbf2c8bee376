//! Macros for defining typed registry keys.

/// Macro to define an enum of registry keys with their on-disk names.
///
/// This generates a fieldless enum with:
/// - `ALL`, every key in declaration order
/// - `as_str()` returning the registry name
/// - `from_name()` for exact, case-sensitive lookup of a registry name
/// - `Display` writing the registry name
///
/// # Example
///
/// ```ignore
/// define_setting_keys! {
///     /// Keys of a registry section.
///     pub enum SettingKey {
///         /// Hostname of the app.
///         Host => "Host",
///     }
/// }
///
/// assert_eq!(SettingKey::Host.as_str(), "Host");
/// ```
#[macro_export]
macro_rules! define_setting_keys {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident => $key:literal,
            )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant,
            )+
        }

        impl $name {
            /// Every key, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Returns the name of this key as written in the registry.
            #[must_use]
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $key,)+
                }
            }

            /// Looks up a key by its registry name.
            #[must_use]
            pub fn from_name(name: &str) -> Option<Self> {
                match name {
                    $($key => Some(Self::$variant),)+
                    _ => None,
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}
