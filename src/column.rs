//! A vertical strip of the screen holding an ordered sequence of windows.
use crate::error::{Error, Result};
use crate::geometry::Screen;
use crate::window::Window;

#[derive(Debug, Clone)]
pub struct Column {
    pub x: i32,
    pub width: i32,
    windows: Vec<Window>,
    screen: Screen,
    pub fullscreen: bool,
}

impl Column {
    pub fn new(screen: Screen) -> Self {
        Self {
            x: screen.xoffset,
            width: screen.width,
            windows: Vec::new(),
            screen,
            fullscreen: false,
        }
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Window> {
        self.windows.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Window> {
        self.windows.iter_mut()
    }

    pub fn add(&mut self, window: Window) {
        self.windows.push(window);
    }

    /// Remove by id; no-op returning `None` if absent.
    pub fn remove(&mut self, id: u32) -> Option<Window> {
        let idx = self.index_by_id(id)?;
        Some(self.windows.remove(idx))
    }

    /// Remove by position; no-op returning `None` if out of range. Used by
    /// the workspace's rebalancing logic, which moves a column's sole
    /// occupant elsewhere by position rather than id.
    pub fn remove_by_index(&mut self, idx: usize) -> Option<Window> {
        if idx < self.windows.len() {
            Some(self.windows.remove(idx))
        } else {
            None
        }
    }

    pub fn swap(&mut self, i: usize, j: usize) -> Result<()> {
        let len = self.windows.len();
        if i >= len || j >= len {
            return Err(Error::OutOfRange {
                len,
                index: i.max(j),
            });
        }
        self.windows.swap(i, j);
        Ok(())
    }

    pub fn index_by_id(&self, id: u32) -> Option<usize> {
        self.windows.iter().position(|w| w.id == id)
    }

    pub fn window_by_index(&self, idx: usize) -> Option<&Window> {
        self.windows.get(idx)
    }

    pub fn window_by_index_mut(&mut self, idx: usize) -> Option<&mut Window> {
        self.windows.get_mut(idx)
    }

    pub fn set_x(&mut self, x: i32) -> i32 {
        self.x = self.screen.xoffset + x;
        self.x
    }

    pub fn set_width_100(&mut self) -> i32 {
        self.width = self.screen.width;
        self.width
    }

    pub fn set_width_50(&mut self) -> i32 {
        self.width = self.screen.width / 2;
        self.width
    }

    pub fn set_width_65(&mut self) -> i32 {
        self.width = ((self.screen.width as f64) * 0.65) as i32;
        self.width
    }

    /// Defined in terms of `set_width_65` so the two widths sum exactly to
    /// the screen width (`SPEC_FULL.md` §4.1).
    pub fn set_width_35(&mut self) -> i32 {
        let wide = self.screen.width as f64 * 0.65;
        self.width = self.screen.width - (wide as i32);
        self.width
    }

    pub fn add_padding(&mut self) {
        self.fullscreen = false;
        self.reshape();
    }

    pub fn remove_padding(&mut self) {
        self.fullscreen = true;
        self.reshape();
    }

    /// Distribute height evenly among windows. Every window but the last
    /// gets `floor(h / n)`; the last absorbs the remainder so the total is
    /// exact (`SPEC_FULL.md` §8, "no drift from integer division").
    pub fn reshape(&mut self) {
        let n = self.windows.len();
        if n == 0 {
            return;
        }

        let (pad_top, pad_bot) = if self.fullscreen {
            (0, 0)
        } else {
            (self.screen.padding_top, self.screen.padding_bottom)
        };

        let height = self.screen.height - (pad_top + pad_bot);
        let h = height / n as i32;
        let x = self.x;
        let width = self.width;

        let mut offset_y = pad_top;
        for win in self.windows.iter_mut().take(n - 1) {
            win.set_y(offset_y);
            win.set_x(x);
            win.set_height(h);
            win.set_width(width);
            offset_y += h;
        }

        let last = &mut self.windows[n - 1];
        last.set_y(offset_y);
        last.set_x(x);
        last.set_height(height + pad_top - offset_y);
        last.set_width(width);
    }
}
