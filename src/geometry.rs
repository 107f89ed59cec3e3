/// Axis-aligned rectangle in world units.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center_y(&self) -> f64 {
        self.y + self.height / 2.0
    }

    /// Inclusive overlap test: rectangles that only touch on an edge still
    /// count as intersecting, so a zero-height beam can hit the ship.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x <= other.right()
            && other.x <= self.right()
            && self.y <= other.bottom()
            && other.y <= self.bottom()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlapping_rects_intersect() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 10.0, 10.0);
        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
    }

    #[test]
    fn test_touching_edges_intersect() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 0.0, 5.0, 5.0);
        assert!(a.intersects(&b));
    }

    #[test]
    fn test_zero_height_rect_intersects_when_inside() {
        let ship = Rect::new(100.0, 100.0, 40.0, 40.0);
        let beam = Rect::new(0.0, 120.0, 700.0, 0.0);
        assert!(beam.intersects(&ship));
    }

    #[test]
    fn test_far_apart_rects_do_not_intersect() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(50.0, 12.0, 1.0, 1.0);
        assert!(!a.intersects(&b));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_intersection_is_symmetric(
                ax in -100.0f64..100.0, ay in -100.0f64..100.0,
                aw in 0.0f64..50.0, ah in 0.0f64..50.0,
                bx in -100.0f64..100.0, by in -100.0f64..100.0,
                bw in 0.0f64..50.0, bh in 0.0f64..50.0,
            ) {
                let a = Rect::new(ax, ay, aw, ah);
                let b = Rect::new(bx, by, bw, bh);
                prop_assert_eq!(a.intersects(&b), b.intersects(&a));
            }
        }
    }
}
