use thiserror::Error;

/// Failures that mean the dataset cannot be produced as-is. None of these are
/// recoverable; callers propagate them up to `main`.
#[derive(Debug, Error)]
pub enum QuizError {
    #[error("no channel matches handle '{handle}'")]
    ChannelNotFound { handle: String },
    #[error("cached payload for video '{video_id}' is malformed: {reason}")]
    MalformedPayload { video_id: String, reason: String },
    #[error("{table} mapping line {line_no} has no '->' separator: {line:?}")]
    MalformedMappingLine {
        table: &'static str,
        line_no: usize,
        line: String,
    },
    #[error("{table} mapping line {line_no} has unexpected value {value:?}")]
    UnexpectedLabel {
        table: &'static str,
        line_no: usize,
        value: String,
    },
    #[error("{table} mapping has no entry for title {title:?}")]
    MissingMapping { table: &'static str, title: String },
    #[error("{size} records share attributes [{key}], more than the allowed {limit}")]
    CollisionLimit {
        key: String,
        size: usize,
        limit: usize,
    },
}
