pub type MorphResult<T> = Result<T, MorphError>;

#[derive(thiserror::Error, Debug)]
pub enum MorphError {
    #[error("no styles registered")]
    EmptyRegistry,

    #[error("style '{name}' declares {count} curve slots, at most 3 are supported")]
    TooManySlots { name: String, count: usize },

    #[error("glyph not found for {0:?}")]
    GlyphNotFound(char),

    #[error("font error at line {line}: {message}")]
    Font { line: usize, message: String },

    #[error("unknown direction '{0}'")]
    UnknownDirection(String),

    #[error("unknown curve '{0}'")]
    UnknownCurve(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl MorphError {
    pub fn font(line: usize, message: impl Into<String>) -> Self {
        Self::Font {
            line,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_culprit() {
        assert_eq!(MorphError::GlyphNotFound('x').to_string(), "glyph not found for 'x'");
        assert!(MorphError::UnknownDirection("sideways".into())
            .to_string()
            .contains("sideways"));
        assert!(MorphError::font(12, "bad BBX").to_string().contains("line 12"));
    }

    #[test]
    fn too_many_slots_reports_count() {
        let err = MorphError::TooManySlots {
            name: "wobble".into(),
            count: 4,
        };

        assert!(err.to_string().contains("4 curve slots"));
    }
}
