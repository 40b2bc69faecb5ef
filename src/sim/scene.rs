/// Scene: the retained display list the game draws into.
///
/// Every visual object gets a `VisualId` on creation. Objects are kept in
/// creation order, which is also the paint order (later on top). The
/// renderer rasterises the list once per frame; the simulation uses it
/// for position queries and overlap tests, the same way a canvas toolkit
/// answers "which items overlap this box".
///
/// Text objects take part in overlap queries with an estimated bounding
/// box derived from their font size.

use crate::domain::entity::{Paint, VisualId};
use crate::domain::physics::Rect;

/// Font request for a text object. `size` is in points; the renderer
/// picks a terminal style from it.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Font {
    pub size: u16,
}

impl Font {
    pub const SCORE: Font = Font { size: 16 };
    pub const CAPTION: Font = Font { size: 26 };
    pub const BANNER: Font = Font { size: 52 };

    /// Is this large enough to render emphasised?
    pub fn is_large(&self) -> bool {
        self.size > 20
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Visual {
    Rectangle { rect: Rect, paint: Paint },
    Sprite { rect: Rect },
    Text { x: i32, y: i32, font: Font, content: String },
}

impl Visual {
    /// Bounding box used for overlap queries.
    pub fn bounds(&self) -> Rect {
        match self {
            Visual::Rectangle { rect, .. } | Visual::Sprite { rect } => *rect,
            Visual::Text { x, y, font, content } => {
                let size = font.size as i32;
                let w = content.chars().count() as i32 * size * 3 / 4;
                Rect::sized(*x, *y, w, size * 3 / 2)
            }
        }
    }

    /// Top-left corner.
    pub fn position(&self) -> (i32, i32) {
        match self {
            Visual::Rectangle { rect, .. } | Visual::Sprite { rect } => (rect.x0, rect.y0),
            Visual::Text { x, y, .. } => (*x, *y),
        }
    }

    fn set_position(&mut self, nx: i32, ny: i32) {
        match self {
            Visual::Rectangle { rect, .. } | Visual::Sprite { rect } => *rect = rect.moved_to(nx, ny),
            Visual::Text { x, y, .. } => {
                *x = nx;
                *y = ny;
            }
        }
    }
}

pub struct Scene {
    next_id: u32,
    objects: Vec<(VisualId, Visual)>,
}

impl Scene {
    pub fn new() -> Self {
        Scene { next_id: 0, objects: Vec::with_capacity(16) }
    }

    fn insert(&mut self, visual: Visual) -> VisualId {
        let id = VisualId(self.next_id);
        self.next_id += 1;
        self.objects.push((id, visual));
        id
    }

    pub fn create_rectangle(&mut self, rect: Rect, paint: Paint) -> VisualId {
        self.insert(Visual::Rectangle { rect, paint })
    }

    pub fn create_sprite(&mut self, x: i32, y: i32, w: i32, h: i32) -> VisualId {
        self.insert(Visual::Sprite { rect: Rect::sized(x, y, w, h) })
    }

    pub fn create_text(&mut self, x: i32, y: i32, font: Font, content: impl Into<String>) -> VisualId {
        self.insert(Visual::Text { x, y, font, content: content.into() })
    }

    /// Remove an object. Unknown ids are ignored.
    pub fn delete(&mut self, id: VisualId) {
        self.objects.retain(|(oid, _)| *oid != id);
    }

    /// Remove every object.
    pub fn clear(&mut self) {
        self.objects.clear();
    }

    /// Move an object so its top-left corner is at (x, y).
    pub fn move_to(&mut self, id: VisualId, x: i32, y: i32) {
        if let Some(v) = self.get_mut(id) {
            v.set_position(x, y);
        }
    }

    /// Move an object by (dx, dy).
    pub fn move_by(&mut self, id: VisualId, dx: i32, dy: i32) {
        if let Some(v) = self.get_mut(id) {
            let (x, y) = v.position();
            v.set_position(x + dx, y + dy);
        }
    }

    #[cfg(test)]
    pub fn position(&self, id: VisualId) -> Option<(i32, i32)> {
        self.get(id).map(Visual::position)
    }

    #[cfg(test)]
    pub fn get(&self, id: VisualId) -> Option<&Visual> {
        self.objects.iter().find(|(oid, _)| *oid == id).map(|(_, v)| v)
    }

    fn get_mut(&mut self, id: VisualId) -> Option<&mut Visual> {
        self.objects.iter_mut().find(|(oid, _)| *oid == id).map(|(_, v)| v)
    }

    /// Ids of every object whose bounds overlap `area`, in paint order.
    pub fn find_overlapping(&self, area: &Rect) -> Vec<VisualId> {
        self.objects.iter()
            .filter(|(_, v)| v.bounds().overlaps(area))
            .map(|(id, _)| *id)
            .collect()
    }

    /// Objects in paint order.
    pub fn iter(&self) -> impl Iterator<Item = &(VisualId, Visual)> {
        self.objects.iter()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.objects.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique_and_stable_across_deletes() {
        let mut s = Scene::new();
        let a = s.create_rectangle(Rect::sized(0, 0, 10, 10), Paint::Blue);
        let b = s.create_sprite(5, 5, 10, 10);
        s.delete(a);
        let c = s.create_text(0, 0, Font::SCORE, "Score: 0");
        assert_ne!(a, c);
        assert_ne!(b, c);
        assert_eq!(s.len(), 2);
        assert!(s.get(a).is_none());
        assert_eq!(s.position(b), Some((5, 5)));
    }

    #[test]
    fn move_to_and_move_by_keep_size() {
        let mut s = Scene::new();
        let r = s.create_rectangle(Rect::sized(10, 20, 200, 50), Paint::Green);
        s.move_by(r, 0, 12);
        assert_eq!(s.position(r), Some((10, 32)));
        s.move_to(r, -5, 100);
        match s.get(r) {
            Some(Visual::Rectangle { rect, .. }) => assert_eq!(*rect, Rect::sized(-5, 100, 200, 50)),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn overlap_query_reports_paint_order() {
        let mut s = Scene::new();
        let floor = s.create_rectangle(Rect::new(4, 750, 1500, 800), Paint::Black);
        let karel = s.create_sprite(725, 690, 50, 60);
        let far = s.create_rectangle(Rect::sized(0, 100, 200, 50), Paint::Blue);
        let hits = s.find_overlapping(&Rect::new(752, 749, 766, 750));
        assert_eq!(hits, vec![floor, karel]);
        assert!(!hits.contains(&far));
    }

    #[test]
    fn text_bounds_scale_with_font() {
        let small = Visual::Text { x: 10, y: 10, font: Font::SCORE, content: "Score: 0".into() };
        let big = Visual::Text { x: 10, y: 10, font: Font::BANNER, content: "Score: 0".into() };
        assert!(big.bounds().width() > small.bounds().width());
        assert_eq!(small.bounds().x0, 10);
    }

    #[test]
    fn clear_and_unknown_ids() {
        let mut s = Scene::new();
        let a = s.create_sprite(0, 0, 1, 1);
        s.clear();
        assert_eq!(s.len(), 0);
        s.move_to(a, 5, 5);
        s.delete(a);
        assert_eq!(s.position(a), None);
    }
}
