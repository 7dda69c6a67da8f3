//! `define_port_error!`: the error enum shape shared by the storage ports.
//!
//! Every variant carries named fields. Each one gets a `#[error]` message and
//! a snake-case constructor whose parameters take `impl Into<T>`, so adapters
//! write `UserPersistenceError::query(err.to_string())` or
//! `TaskPersistenceError::owner_missing(owner)`.

macro_rules! define_port_error {
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident { $($field:ident : $ty:ty),+ $(,)? } => $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant { $($field: $ty),+ },
            )*
        }

        impl $name {
            $(
                ::paste::paste! {
                    #[doc = "Builds [`" $name "::" $variant "`]."]
                    pub fn [<$variant:snake>]($($field: impl Into<$ty>),+) -> Self {
                        Self::$variant { $($field: $field.into()),+ }
                    }
                }
            )*
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    define_port_error! {
        pub enum LedgerError {
            Unreachable { message: String } => "ledger unreachable: {message}",
            Missing { id: i64 } => "entry {id} missing",
            Rejected { message: String, id: i64 } => "entry {id} rejected: {message}",
        }
    }

    #[test]
    fn string_fields_accept_borrowed_text() {
        let err = LedgerError::unreachable("refused");
        assert_eq!(err.to_string(), "ledger unreachable: refused");
    }

    #[test]
    fn numeric_fields_keep_their_type() {
        assert_eq!(LedgerError::missing(42_i64), LedgerError::Missing { id: 42 });
    }

    #[test]
    fn constructor_parameters_follow_field_order() {
        let err = LedgerError::rejected("stale", 7_i64);
        assert_eq!(err.to_string(), "entry 7 rejected: stale");
    }
}
