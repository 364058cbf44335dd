/// A detected face in frame pixel coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct Region {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub confidence: f64,
}

impl Region {
    /// Builds a region from corner coordinates, clamped to the frame.
    ///
    /// Returns `None` when nothing of the box is left inside the frame.
    pub fn from_corners(
        (x1, y1, x2, y2): (f64, f64, f64, f64),
        frame_width: u32,
        frame_height: u32,
        confidence: f64,
    ) -> Option<Self> {
        let fw = frame_width as f64;
        let fh = frame_height as f64;
        let left = x1.clamp(0.0, fw).round() as i32;
        let top = y1.clamp(0.0, fh).round() as i32;
        let right = x2.clamp(0.0, fw).round() as i32;
        let bottom = y2.clamp(0.0, fh).round() as i32;

        if right <= left || bottom <= top {
            return None;
        }
        Some(Self {
            x: left,
            y: top,
            width: right - left,
            height: bottom - top,
            confidence,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_from_corners_inside_frame() {
        let r = Region::from_corners((10.0, 20.0, 110.0, 70.0), 640, 480, 0.9).unwrap();
        assert_eq!((r.x, r.y, r.width, r.height), (10, 20, 100, 50));
    }

    #[test]
    fn test_from_corners_clamps_to_frame() {
        let r = Region::from_corners((-30.0, -10.0, 50.0, 500.0), 640, 480, 0.9).unwrap();
        assert_eq!((r.x, r.y), (0, 0));
        assert_eq!((r.width, r.height), (50, 480));
    }

    #[rstest]
    #[case::fully_left((-100.0, 0.0, -10.0, 50.0))]
    #[case::fully_below((0.0, 500.0, 50.0, 600.0))]
    #[case::inverted((50.0, 50.0, 10.0, 10.0))]
    fn test_from_corners_rejects_empty(#[case] corners: (f64, f64, f64, f64)) {
        assert!(Region::from_corners(corners, 640, 480, 0.9).is_none());
    }
}
