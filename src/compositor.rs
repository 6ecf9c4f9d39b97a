//! Scanline compositing for the scrolling viewport.
//!
//! The render loop asks for one line at a time, horizontal or vertical,
//! anchored at a map pixel coordinate. Each line is the room photo with
//! every intersecting object drawn over it in iteration order.

use crate::color::{Color6, OBJ_CLR_TRANSP};
use crate::palette::PHOTO_INDEX_BASE;
use crate::photo::{ObjectImage, Photo};

/// Index used where the line leaves the photo.
pub const BACKGROUND_INDEX: u8 = 0;

/// Default viewport width in pixels.
pub const SCROLL_X_DIM: usize = 320;

/// Default viewport height in pixels.
pub const SCROLL_Y_DIM: usize = 182;

/// Something drawn over the room photo.
pub trait SceneObject {
    /// Map x coordinate of the image's left edge; may be negative.
    fn x(&self) -> i32;
    /// Map y coordinate of the image's top edge; may be negative.
    fn y(&self) -> i32;
    fn image(&self) -> &ObjectImage;
}

/// A room as seen by the compositor.
pub trait Room {
    type Object: SceneObject;

    fn photo(&self) -> &Photo;

    /// Objects in drawing order. Called once per line, so it must restart
    /// from the first object every time.
    fn objects(&self) -> impl Iterator<Item = &Self::Object>;
}

/// Receives palette uploads when a room is prepared.
pub trait PaletteSink {
    /// Load `colors` into consecutive display palette registers starting at `first`.
    fn set_palette(&mut self, first: u8, colors: &[Color6]);
}

/// An object image placed at a map position.
#[derive(Debug, Clone, Copy)]
pub struct Placed<'a> {
    pub x: i32,
    pub y: i32,
    pub image: &'a ObjectImage,
}

impl SceneObject for Placed<'_> {
    fn x(&self) -> i32 {
        self.x
    }

    fn y(&self) -> i32 {
        self.y
    }

    fn image(&self) -> &ObjectImage {
        self.image
    }
}

impl<T: SceneObject + ?Sized> SceneObject for &T {
    fn x(&self) -> i32 {
        (**self).x()
    }

    fn y(&self) -> i32 {
        (**self).y()
    }

    fn image(&self) -> &ObjectImage {
        (**self).image()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// A row; the anchor is its leftmost pixel.
    Horizontal,
    /// A column; the anchor is its top pixel.
    Vertical,
}

impl Orientation {
    /// Split a point into (along the line, across the line).
    fn split<T>(self, x: T, y: T) -> (T, T) {
        match self {
            Self::Horizontal => (x, y),
            Self::Vertical => (y, x),
        }
    }

    /// Inverse of [`Self::split`].
    fn join<T>(self, along: T, across: T) -> (T, T) {
        self.split(along, across)
    }
}

/// Viewport line lengths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: usize,
    pub height: usize,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: SCROLL_X_DIM,
            height: SCROLL_Y_DIM,
        }
    }
}

impl Viewport {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    /// Buffer length for a line of the given orientation.
    pub fn line_len(&self, orientation: Orientation) -> usize {
        match orientation {
            Orientation::Horizontal => self.width,
            Orientation::Vertical => self.height,
        }
    }
}

/// Draws viewport lines for the current room.
///
/// Holds no state between line requests other than the room chosen by the
/// last [`prep_room`](Self::prep_room).
#[derive(Debug)]
pub struct Compositor<'r, R> {
    room: Option<&'r R>,
    viewport: Viewport,
}

impl<'r, R: Room> Compositor<'r, R> {
    pub fn new(viewport: Viewport) -> Self {
        Self { room: None, viewport }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn current_room(&self) -> Option<&'r R> {
        self.room
    }

    /// Make `room` current and load its photo colors into the display palette.
    pub fn prep_room<S: PaletteSink + ?Sized>(&mut self, room: &'r R, display: &mut S) {
        let photo = room.photo();
        log::debug!(
            "preparing room with {}x{} photo",
            photo.width(),
            photo.height()
        );
        display.set_palette(PHOTO_INDEX_BASE, photo.palette().entries());
        self.room = Some(room);
    }

    /// Draw the row whose leftmost pixel is map coordinate `(x, y)`.
    pub fn fill_horiz_buffer(&self, x: i32, y: i32, buf: &mut [u8]) {
        self.fill_line(Orientation::Horizontal, x, y, buf);
    }

    /// Draw the column whose top pixel is map coordinate `(x, y)`.
    pub fn fill_vert_buffer(&self, x: i32, y: i32, buf: &mut [u8]) {
        self.fill_line(Orientation::Vertical, x, y, buf);
    }

    /// Draw one line starting at `(x, y)`.
    ///
    /// `buf` must be exactly the viewport's line length for `orientation`.
    /// With no current room the line is background.
    pub fn fill_line(&self, orientation: Orientation, x: i32, y: i32, buf: &mut [u8]) {
        debug_assert_eq!(
            buf.len(),
            self.viewport.line_len(orientation),
            "line buffer does not match the viewport"
        );
        match self.room {
            Some(room) => composite_line(room, orientation, x, y, buf),
            None => buf.fill(BACKGROUND_INDEX),
        }
    }
}

/// Render one line of `room` into `buf`.
pub fn composite_line<R: Room + ?Sized>(
    room: &R,
    orientation: Orientation,
    x: i32,
    y: i32,
    buf: &mut [u8],
) {
    let photo = room.photo();
    let (start, fixed) = orientation.split(x as i64, y as i64);
    let len = buf.len() as i64;

    for (i, slot) in buf.iter_mut().enumerate() {
        let (px, py) = orientation.join(start + i as i64, fixed);
        *slot = photo.index_at(px, py).unwrap_or(BACKGROUND_INDEX);
    }

    for obj in room.objects() {
        let image = obj.image();
        let (obj_start, obj_fixed) = orientation.split(obj.x() as i64, obj.y() as i64);
        let (img_along, img_across) = orientation.split(image.width() as i64, image.height() as i64);

        // Skip objects that miss the line.
        if fixed < obj_fixed
            || fixed >= obj_fixed + img_across
            || start + len <= obj_start
            || start >= obj_start + img_along
        {
            continue;
        }

        let across = (fixed - obj_fixed) as usize;

        // Clip whichever of the line and the image starts first.
        let (dst, src) = if start <= obj_start {
            (obj_start - start, 0)
        } else {
            (0, start - obj_start)
        };
        let count = (len - dst).min(img_along - src);

        overlay(
            image,
            orientation,
            across,
            src as usize,
            &mut buf[dst as usize..(dst + count) as usize],
        );
    }
}

/// Copy the opaque pixels of one image row or column into `out`.
fn overlay(image: &ObjectImage, orientation: Orientation, across: usize, src: usize, out: &mut [u8]) {
    let width = image.width() as usize;
    let pixels = image.pixels();
    for (k, slot) in out.iter_mut().enumerate() {
        let (ix, iy) = orientation.join(src + k, across);
        let pixel = pixels[iy * width + ix];
        if pixel != OBJ_CLR_TRANSP {
            *slot = pixel;
        }
    }
}
