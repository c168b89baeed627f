use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Unknown technology key or an unresolvable policy reference.
    /// Fatal to the technology that requested it, not to the batch.
    #[error("configuration error for technology `{technology}`: {message}")]
    Config { technology: String, message: String },

    /// A generator hook hit a missing or malformed attribute.
    /// Scoped to one (table, technology) pair.
    #[error("generation failed for table `{table}`, technology `{technology}`: {message}")]
    Generation {
        table: String,
        technology: String,
        message: String,
    },

    /// The schema provider could not produce a usable schema.
    #[error("schema error: {0}")]
    Schema(String),

    #[error("{0}")]
    StdIoError(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn config<T: Into<String>, M: Into<String>>(technology: T, message: M) -> Self {
        Self::Config {
            technology: technology.into(),
            message: message.into(),
        }
    }

    pub(crate) fn generation<T, K, M>(table: T, technology: K, message: M) -> Self
    where
        T: Into<String>,
        K: Into<String>,
        M: Into<String>,
    {
        Self::Generation {
            table: table.into(),
            technology: technology.into(),
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Schema(err.to_string())
    }
}
