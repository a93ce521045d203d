//! Display/FromStr generation for the small status enums persisted as text
//! columns (invoice status, log severity).
//!
//! # Example
//!
//! ```rust
//! use wooledger_domain::impl_domain_status_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum ExportState {
//!     Queued,
//!     Sent,
//! }
//!
//! impl_domain_status_conversions!(ExportState {
//!     Queued => "queued",
//!     Sent => "sent",
//! });
//!
//! assert_eq!(ExportState::Sent.to_string(), "sent");
//! assert_eq!("QUEUED".parse::<ExportState>(), Ok(ExportState::Queued));
//! ```

/// Implements `Display` and `FromStr` for a fieldless enum.
///
/// Parsing lowercases its input before matching, so every string literal
/// passed to the macro must itself be lowercase.
#[macro_export]
macro_rules! impl_domain_status_conversions {
    ($enum_name:ident { $($variant:ident => $str:literal),+ $(,)? }) => {
        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(Self::$variant => f.write_str($str),)+
                }
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($str => Ok(Self::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($enum_name), s)),
                }
            }
        }
    };
}
