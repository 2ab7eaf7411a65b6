use super::errors::AppError;
use read_color::rgb;
use tui::style::Color;

pub fn parse_color(text: &str) -> Result<Color, AppError> {
    if text.starts_with('#') {
        let mut chars = text.chars();
        chars.next();

        return match rgb(&mut chars) {
            Some([r, g, b]) => Ok(Color::Rgb(r, g, b)),
            None => Err(AppError::invalid_input(format!(
                "Can't parse hex color {}",
                text
            ))),
        };
    }

    Err(AppError::invalid_input(format!(
        "Can't parse color {}",
        text
    )))
}

/// Parses a split field such as `"2, 1"` into per-cell piece counts.
pub fn parse_split(input: &str) -> Result<Vec<u32>, AppError> {
    if input.trim().is_empty() {
        return Err(AppError::invalid_input("split is empty"));
    }

    input
        .split(',')
        .map(|value| {
            value.trim().parse::<u32>().map_err(|_| {
                AppError::invalid_input(format!("'{}' is not a piece count", value.trim()))
            })
        })
        .collect()
}

/// One-indexed coordinate typed by the user; empty or non-numeric input is `None`.
pub fn parse_input_coord(input: &str) -> Option<u8> {
    input.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_colors() {
        assert_eq!(Ok(Color::Rgb(0xaf, 0x97, 0x69)), parse_color("#af9769"));
        assert!(parse_color("af9769").is_err());
        assert!(parse_color("#zz").is_err());
    }

    #[test]
    fn parses_split_lists() {
        assert_eq!(Ok(vec![2, 1]), parse_split("2,1"));
        assert_eq!(Ok(vec![3]), parse_split(" 3 "));
        assert_eq!(Ok(vec![1, 1, 1]), parse_split("1, 1 ,1"));
        assert!(parse_split("").is_err());
        assert!(parse_split("2,").is_err());
        assert!(parse_split("2,x").is_err());
    }

    #[test]
    fn parses_input_coords() {
        assert_eq!(Some(3), parse_input_coord("3"));
        assert_eq!(None, parse_input_coord(""));
        assert_eq!(None, parse_input_coord("-1"));
    }
}
