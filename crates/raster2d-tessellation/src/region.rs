//! Pixel-aligned rectangle-list region algebra, grounded on `cairo-region.c`'s
//! banded-rectangle representation.

/// An integer device-pixel rectangle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RegionBox {
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
}

impl RegionBox {
    pub fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        RegionBox { x0, y0, x1, y1 }
    }

    pub fn is_empty(&self) -> bool {
        self.x1 <= self.x0 || self.y1 <= self.y0
    }

    pub fn intersect(&self, other: &RegionBox) -> Option<RegionBox> {
        let b = RegionBox::new(
            self.x0.max(other.x0),
            self.y0.max(other.y0),
            self.x1.min(other.x1),
            self.y1.min(other.y1),
        );
        if b.is_empty() {
            None
        } else {
            Some(b)
        }
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x0 && y >= self.y0 && x < self.x1 && y < self.y1
    }
}

/// A union of disjoint, non-adjacent boxes kept in row-major order — the
/// representation `cairo-region.c` calls "banded": boxes in the same y
/// band are stored contiguously and merged where they touch.
#[derive(Clone, Debug, Default)]
pub struct Region {
    boxes: Vec<RegionBox>,
}

impl Region {
    pub fn empty() -> Self {
        Region { boxes: Vec::new() }
    }

    pub fn from_box(b: RegionBox) -> Self {
        if b.is_empty() {
            Region::empty()
        } else {
            Region { boxes: vec![b] }
        }
    }

    pub fn boxes(&self) -> &[RegionBox] {
        &self.boxes
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    /// Unions `other` into `self`, re-normalizing by sorting and merging
    /// any boxes that are now row-adjacent and column-identical — a
    /// simplification of `cairo-region.c`'s full band coalescing that
    /// still satisfies the "union of boxes" equivalence.
    pub fn union(&mut self, other: &Region) {
        self.boxes.extend_from_slice(&other.boxes);
        self.normalize();
    }

    pub fn intersect(&self, other: &Region) -> Region {
        let mut boxes = Vec::new();
        for a in &self.boxes {
            for b in &other.boxes {
                if let Some(i) = a.intersect(b) {
                    boxes.push(i);
                }
            }
        }
        let mut region = Region { boxes };
        region.normalize();
        region
    }

    pub fn contains_point(&self, x: i32, y: i32) -> bool {
        self.boxes.iter().any(|b| b.contains(x, y))
    }

    /// Subtracts `other` from `self`, box by box: each of `self`'s boxes is
    /// cut along every edge of every overlapping box in `other`, keeping the
    /// up-to-four leftover pieces (above, below, left, right) that lie
    /// outside `other`'s box. Mirrors `cairo-region.c`'s `pixman_region32_subtract`
    /// in spirit (subtraction via successive per-box cuts) without adopting
    /// its sweep-line implementation.
    pub fn subtract(&self, other: &Region) -> Region {
        let mut boxes = self.boxes.clone();
        for cut in &other.boxes {
            let mut next = Vec::with_capacity(boxes.len());
            for b in boxes {
                match b.intersect(cut) {
                    None => next.push(b),
                    Some(overlap) => {
                        if b.y0 < overlap.y0 {
                            next.push(RegionBox::new(b.x0, b.y0, b.x1, overlap.y0));
                        }
                        if overlap.y1 < b.y1 {
                            next.push(RegionBox::new(b.x0, overlap.y1, b.x1, b.y1));
                        }
                        if b.x0 < overlap.x0 {
                            next.push(RegionBox::new(b.x0, overlap.y0, overlap.x0, overlap.y1));
                        }
                        if overlap.x1 < b.x1 {
                            next.push(RegionBox::new(overlap.x1, overlap.y0, b.x1, overlap.y1));
                        }
                    }
                }
            }
            boxes = next;
        }
        let mut region = Region { boxes };
        region.normalize();
        region
    }

    /// Alias for [`Region::subtract`], matching the "subtract" naming used
    /// elsewhere for this operation.
    pub fn difference(&self, other: &Region) -> Region {
        self.subtract(other)
    }

    /// `Some(rects)` always succeeds for a `Region` (by construction it's
    /// already a box list); mirrors `copy_rectangle_list`'s return type at
    /// the clip layer, which must handle the non-region case itself.
    pub fn rectangles(&self) -> Vec<RegionBox> {
        self.boxes.clone()
    }

    fn normalize(&mut self) {
        self.boxes.retain(|b| !b.is_empty());
        self.boxes.sort_by(|a, b| (a.y0, a.x0).cmp(&(b.y0, b.x0)));
        let mut merged: Vec<RegionBox> = Vec::with_capacity(self.boxes.len());
        for b in self.boxes.drain(..) {
            if let Some(last) = merged.last_mut() {
                if last.y0 == b.y0 && last.y1 == b.y1 && last.x1 == b.x0 {
                    last.x1 = b.x1;
                    continue;
                }
            }
            merged.push(b);
        }
        self.boxes = merged;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn union_merges_adjacent_same_band_boxes() {
        let mut r = Region::from_box(RegionBox::new(0, 0, 10, 10));
        r.union(&Region::from_box(RegionBox::new(10, 0, 20, 10)));
        assert_eq!(r.boxes().len(), 1);
        assert_eq!(r.boxes()[0], RegionBox::new(0, 0, 20, 10));
    }

    #[test]
    fn disjoint_boxes_stay_separate() {
        let mut r = Region::from_box(RegionBox::new(0, 0, 10, 10));
        r.union(&Region::from_box(RegionBox::new(0, 20, 10, 30)));
        assert_eq!(r.boxes().len(), 2);
    }

    #[test]
    fn intersect_clips_to_overlap() {
        let a = Region::from_box(RegionBox::new(0, 0, 10, 10));
        let b = Region::from_box(RegionBox::new(5, 5, 15, 15));
        let i = a.intersect(&b);
        assert_eq!(i.boxes(), &[RegionBox::new(5, 5, 10, 10)]);
    }

    #[test]
    fn contains_point_checks_every_box() {
        let r = Region::from_box(RegionBox::new(0, 0, 10, 10));
        assert!(r.contains_point(5, 5));
        assert!(!r.contains_point(15, 5));
    }

    #[test]
    fn subtract_punches_a_hole_in_the_middle() {
        let a = Region::from_box(RegionBox::new(0, 0, 10, 10));
        let b = Region::from_box(RegionBox::new(4, 4, 6, 6));
        let diff = a.subtract(&b);
        assert!(!diff.contains_point(5, 5));
        assert!(diff.contains_point(0, 0));
        assert!(diff.contains_point(9, 9));
    }

    #[test]
    fn subtract_disjoint_box_is_a_no_op() {
        let a = Region::from_box(RegionBox::new(0, 0, 10, 10));
        let b = Region::from_box(RegionBox::new(20, 20, 30, 30));
        let diff = a.subtract(&b);
        assert_eq!(diff.boxes(), a.boxes());
    }

    #[test]
    fn subtract_everything_leaves_empty_region() {
        let a = Region::from_box(RegionBox::new(0, 0, 10, 10));
        let diff = a.subtract(&a.clone());
        assert!(diff.is_empty());
    }
}
