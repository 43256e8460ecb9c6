//! Helper macro generating the port error enums.

/// Define a `thiserror` enum for a port with snake-case constructor fns.
///
/// Every variant uses named fields; each constructor accepts `impl Into`
/// for its fields so adapters can pass `&str` where a `String` is stored.
macro_rules! define_port_error {
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident { $($field:ident : $ty:ty),* $(,)? } => $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant { $($field : $ty),* },
            )*
        }

        ::paste::paste! {
            impl $name {
                $(
                    #[doc = concat!("Build [`", stringify!($name), "::", stringify!($variant), "`].")]
                    pub fn [<$variant:snake>]($($field: impl Into<$ty>),*) -> Self {
                        Self::$variant { $($field: $field.into()),* }
                    }
                )*
            }
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    define_port_error! {
        /// Example error for macro coverage.
        pub enum ExamplePortError {
            /// String-carrying variant.
            Broken { message: String } => "broken: {message}",
            /// Mixed-field variant.
            Stale { message: String, expected: u32 } => "stale at {expected}: {message}",
        }
    }

    #[test]
    fn constructors_accept_str_for_string_fields() {
        let err = ExamplePortError::broken("cable unplugged");
        assert_eq!(err.to_string(), "broken: cable unplugged");
    }

    #[test]
    fn constructors_support_mixed_fields() {
        let err = ExamplePortError::stale("row moved on", 4_u32);
        assert_eq!(err.to_string(), "stale at 4: row moved on");
    }
}
