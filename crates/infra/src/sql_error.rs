//! Translation of database driver errors into the Cinelog taxonomy

use cinelog_core::CinelogError;

/// Which side of a store an operation was on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Read,
    Write,
}

/// SQLSTATE classes meaning the server could not be used at all:
/// `08` connection exception, `28` invalid authorization, `57` operator
/// intervention (shutdown in progress and the like).
const UNAVAILABLE_CLASSES: [&str; 3] = ["08", "28", "57"];

/// Map a sqlx error raised against `store` during `op`
///
/// Transport, pool and authorization failures become `StoreUnavailable`.
/// Other server-side errors become `WriteRejected` on the write path and
/// `QueryFailed` on the read path.
pub fn map_sqlx_error(store: &str, op: Operation, context: &str, err: sqlx::Error) -> CinelogError {
    match err {
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::Configuration(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed => {
            CinelogError::store_unavailable(store, format!("{}: {}", context, err))
        }
        sqlx::Error::Database(db) => {
            let unavailable = db
                .code()
                .map(|code| UNAVAILABLE_CLASSES.iter().any(|class| code.starts_with(class)))
                .unwrap_or(false);

            let message = format!("{}: {}", context, db);
            if unavailable {
                CinelogError::store_unavailable(store, message)
            } else if op == Operation::Write {
                CinelogError::write_rejected(message)
            } else {
                CinelogError::query_failed(message)
            }
        }
        other => match op {
            Operation::Write => CinelogError::write_rejected(format!("{}: {}", context, other)),
            Operation::Read => CinelogError::query_failed(format!("{}: {}", context, other)),
        },
    }
}

/// Build a case-insensitive `LIKE` substring pattern
///
/// The input is lowercased and the `LIKE` metacharacters are escaped so a
/// user typing `100%` matches that literal text.
pub fn like_pattern(input: &str) -> String {
    let mut pattern = String::with_capacity(input.len() + 2);
    pattern.push('%');
    for c in input.trim().to_lowercase().chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
