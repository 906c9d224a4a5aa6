//! Error types for texel buffer operations

/// Errors reported by the validated entry points.
///
/// The kernels themselves are infallible; every check happens once, when a
/// buffer is wrapped in a view or a mip layout is matched against a slice.
#[derive(Debug, thiserror::Error)]
pub enum TexelError {
    #[error("Zero-sized image: {width}x{height}")]
    ZeroDimension { width: u32, height: u32 },

    #[error("{what} buffer too small: need {required} elements, got {actual}")]
    BufferTooSmall {
        what: &'static str,
        required: usize,
        actual: usize,
    },

    #[error("Too many mip levels: requested {requested}, full chain has {max}")]
    TooManyLevels { requested: u32, max: u32 },

    #[error("Failed to read config: {0}")]
    ConfigIo(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, TexelError>;

/// Reject images with a zero-sized axis.
pub(crate) fn check_extent(width: u32, height: u32) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(TexelError::ZeroDimension { width, height });
    }
    Ok(())
}

/// Ensure a slice holds at least `required` elements.
pub(crate) fn check_len(what: &'static str, required: usize, actual: usize) -> Result<()> {
    if actual < required {
        return Err(TexelError::BufferTooSmall {
            what,
            required,
            actual,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            TexelError::ZeroDimension {
                width: 0,
                height: 16
            }
            .to_string(),
            "Zero-sized image: 0x16"
        );
        assert_eq!(
            TexelError::BufferTooSmall {
                what: "RGBA",
                required: 84,
                actual: 64
            }
            .to_string(),
            "RGBA buffer too small: need 84 elements, got 64"
        );
        assert_eq!(
            TexelError::TooManyLevels {
                requested: 12,
                max: 9
            }
            .to_string(),
            "Too many mip levels: requested 12, full chain has 9"
        );
    }

    #[test]
    fn test_check_len() {
        assert!(check_len("height", 16, 16).is_ok());
        assert!(check_len("height", 16, 32).is_ok());
        assert!(matches!(
            check_len("height", 16, 15),
            Err(TexelError::BufferTooSmall { required: 16, actual: 15, .. })
        ));
    }

    #[test]
    fn test_check_extent() {
        assert!(check_extent(1, 1).is_ok());
        assert!(check_extent(0, 4).is_err());
        assert!(check_extent(4, 0).is_err());
    }
}
