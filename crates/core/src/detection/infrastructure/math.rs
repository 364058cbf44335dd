//! Box geometry shared by the YOLO detection backends.

/// IoU between two bounding boxes represented as `[x1, y1, x2, y2]`.
pub fn bbox_iou(a: &[f64; 4], b: &[f64; 4]) -> f64 {
    let x1 = a[0].max(b[0]);
    let y1 = a[1].max(b[1]);
    let x2 = a[2].min(b[2]);
    let y2 = a[3].min(b[3]);

    let inter = (x2 - x1).max(0.0) * (y2 - y1).max(0.0);
    if inter == 0.0 {
        return 0.0;
    }

    let area_a = (a[2] - a[0]) * (a[3] - a[1]);
    let area_b = (b[2] - b[0]) * (b[3] - b[1]);
    inter / (area_a + area_b - inter)
}

/// A scored box awaiting non-maximum suppression.
#[derive(Clone, Debug, PartialEq)]
pub struct Candidate {
    pub bbox: [f64; 4],
    pub score: f64,
    pub class_id: usize,
}

/// Greedy NMS: highest score first, suppressing boxes of the same class
/// whose IoU with a kept box exceeds `iou_thresh`.
pub fn nms(mut candidates: Vec<Candidate>, iou_thresh: f64) -> Vec<Candidate> {
    candidates.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut keep: Vec<Candidate> = Vec::new();
    for c in candidates {
        let suppressed = keep
            .iter()
            .any(|k| k.class_id == c.class_id && bbox_iou(&k.bbox, &c.bbox) > iou_thresh);
        if !suppressed {
            keep.push(c);
        }
    }
    keep
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn candidate(bbox: [f64; 4], score: f64, class_id: usize) -> Candidate {
        Candidate {
            bbox,
            score,
            class_id,
        }
    }

    #[test]
    fn test_bbox_iou_no_overlap() {
        let a = [0.0, 0.0, 10.0, 10.0];
        let b = [20.0, 20.0, 30.0, 30.0];
        assert_relative_eq!(bbox_iou(&a, &b), 0.0);
    }

    #[test]
    fn test_bbox_iou_partial_overlap() {
        let a = [0.0, 0.0, 10.0, 10.0];
        let b = [5.0, 5.0, 15.0, 15.0];
        assert_relative_eq!(bbox_iou(&a, &b), 25.0 / 175.0);
    }

    #[test]
    fn test_nms_keeps_highest_score() {
        let kept = nms(
            vec![
                candidate([0.0, 0.0, 100.0, 100.0], 0.5, 0),
                candidate([2.0, 2.0, 102.0, 102.0], 0.9, 0),
            ],
            0.45,
        );
        assert_eq!(kept.len(), 1);
        assert_relative_eq!(kept[0].score, 0.9);
    }

    #[test]
    fn test_nms_keeps_distinct_boxes() {
        let kept = nms(
            vec![
                candidate([0.0, 0.0, 50.0, 50.0], 0.9, 0),
                candidate([200.0, 200.0, 250.0, 250.0], 0.8, 0),
            ],
            0.45,
        );
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn test_nms_is_class_aware() {
        // A phone held in front of a face overlaps heavily but is a
        // different class, so both survive.
        let kept = nms(
            vec![
                candidate([0.0, 0.0, 100.0, 100.0], 0.9, 0),
                candidate([5.0, 5.0, 100.0, 100.0], 0.8, 67),
            ],
            0.45,
        );
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn test_nms_empty() {
        assert!(nms(Vec::new(), 0.45).is_empty());
    }
}
