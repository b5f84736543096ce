/// Errors surfaced by the content, storage, and configuration layers.
///
/// The typing and game cores never produce these: malformed keystrokes and
/// out-of-range operations degrade to no-ops instead.
#[derive(Debug, thiserror::Error)]
pub enum KetikError {
    #[error("no lesson for level {level} sublevel {sublevel}")]
    LessonNotFound { level: u8, sublevel: u8 },

    #[error("no content for level {0}")]
    LevelNotFound(u8),

    #[error("embedded content is malformed: {0}")]
    Content(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),
}

pub type Result<T> = std::result::Result<T, KetikError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lesson_not_found_message_names_the_lesson() {
        let err = KetikError::LessonNotFound {
            level: 2,
            sublevel: 7,
        };
        assert_eq!(err.to_string(), "no lesson for level 2 sublevel 7");
    }

    #[test]
    fn io_errors_convert() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: KetikError = io.into();
        assert!(matches!(err, KetikError::Io(_)));
    }
}
