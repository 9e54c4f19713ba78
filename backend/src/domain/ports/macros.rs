//! `define_port_error!`: declares the error enum of a driven port.
//!
//! Every variant carries a single `message: String` describing the adapter
//! failure. The macro adds the `thiserror` display text, a snake_case
//! constructor taking `impl Into<String>` and a [`message`] accessor, so
//! adapters write `RecipeRepositoryError::query(err.to_string())` and
//! services can log the raw text without matching on the variant.
//!
//! ```ignore
//! define_port_error! {
//!     /// Failures raised by the tag store.
//!     pub enum TagStoreError {
//!         /// The pool had no connection to give.
//!         Connection => "tag store connection failed: {message}",
//!     }
//! }
//! ```
//!
//! [`message`]: #method.message

macro_rules! define_port_error {
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$doc:meta])*
                $variant:ident => $display:literal
            ),+ $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$doc])*
                #[error($display)]
                $variant { message: String },
            )+
        }

        impl $name {
            ::paste::paste! {
                $(
                    #[doc = "Build the `" $variant "` variant."]
                    pub fn [<$variant:snake>](message: impl Into<String>) -> Self {
                        Self::$variant { message: message.into() }
                    }
                )+
            }

            /// Adapter-supplied detail, whatever the variant.
            pub fn message(&self) -> &str {
                match self {
                    $( Self::$variant { message } )|+ => message,
                }
            }
        }
    };
}

pub(crate) use define_port_error;
