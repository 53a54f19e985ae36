use std::cmp::Ordering;

use crate::processor::ocr::TextRegion;

/// Joins recognized regions into a single block in reading order.
///
/// Regions are sorted top of page first (descending `y`, since the origin is
/// bottom-left), then left to right. Regions sharing a visual line but with
/// slightly different `y` are not merged; only exact `y` ties fall back to `x`.
/// Multi-column layouts are not reconstructed.
pub fn reconstruct(mut regions: Vec<TextRegion>) -> String {
    regions.sort_by(reading_order);

    regions
        .iter()
        .map(|r| r.text.as_str())
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn reading_order(a: &TextRegion, b: &TextRegion) -> Ordering {
    b.bounding_box
        .y
        .total_cmp(&a.bounding_box.y)
        .then_with(|| a.bounding_box.x.total_cmp(&b.bounding_box.x))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processor::ocr::BoundingBox;

    fn region(x: f64, y: f64, text: &str) -> TextRegion {
        TextRegion::new(BoundingBox::new(x, y, 0.1, 0.05), text)
    }

    #[test]
    fn test_top_to_bottom() {
        let regions = vec![
            region(0.1, 0.2, "bottom"),
            region(0.1, 0.9, "top"),
            region(0.1, 0.5, "middle"),
        ];
        assert_eq!(reconstruct(regions), "top\nmiddle\nbottom");
    }

    #[test]
    fn test_same_line_left_to_right() {
        let regions = vec![
            region(0.7, 0.5, "right"),
            region(0.1, 0.5, "left"),
            region(0.4, 0.5, "center"),
        ];
        assert_eq!(reconstruct(regions), "left\ncenter\nright");
    }

    #[test]
    fn test_slightly_different_y_is_not_merged() {
        // The lower-left region comes after the higher-right one
        let regions = vec![region(0.1, 0.500, "left"), region(0.6, 0.501, "right")];
        assert_eq!(reconstruct(regions), "right\nleft");
    }

    #[test]
    fn test_independent_of_input_order() {
        let regions = vec![
            region(0.1, 0.9, "Alice: hi"),
            region(0.5, 0.9, "10:01"),
            region(0.1, 0.7, "Bob: see www.example.org"),
            region(0.1, 0.3, "Alice: thanks"),
            region(0.8, 0.3, "10:05"),
        ];
        let expected = reconstruct(regions.clone());

        let mut reversed = regions.clone();
        reversed.reverse();
        assert_eq!(reconstruct(reversed), expected);

        let mut rotated = regions.clone();
        rotated.rotate_left(2);
        assert_eq!(reconstruct(rotated), expected);

        let mut swapped = regions;
        swapped.swap(0, 4);
        swapped.swap(1, 3);
        assert_eq!(reconstruct(swapped), expected);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(reconstruct(Vec::new()), "");
    }

    #[test]
    fn test_skips_empty_text() {
        let regions = vec![
            region(0.1, 0.9, "first"),
            region(0.1, 0.5, ""),
            region(0.1, 0.1, "last"),
        ];
        assert_eq!(reconstruct(regions), "first\nlast");
    }
}
