//! # ImageCard Component
//!
//! One fetched image in the results list: a bordered card whose title is
//! the caption and whose body is a true-colour half-block thumbnail.
//!
//! Each terminal cell shows two thumbnail pixels stacked vertically: the
//! upper one as the `▀` foreground, the lower one as the background.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, BorderType, Widget};

use crate::core::fetch::{FetchedImage, Thumbnail};

pub struct ImageCard<'a> {
    image: &'a FetchedImage,
    number: usize,
    is_latest: bool,
}

impl<'a> ImageCard<'a> {
    pub fn new(image: &'a FetchedImage, number: usize, is_latest: bool) -> Self {
        Self {
            image,
            number,
            is_latest,
        }
    }

    /// Rows the card occupies: thumbnail rows plus borders.
    pub fn calculate_height(image: &FetchedImage) -> u16 {
        image.thumbnail.height.div_ceil(2) as u16 + 2
    }

    fn caption(&self) -> String {
        format!(
            " #{} {} · {}×{} · {} · {} ",
            self.number,
            self.image.request.label(),
            self.image.width,
            self.image.height,
            format_bytes(self.image.byte_len),
            self.image.fetched_at.format("%H:%M:%S"),
        )
    }
}

impl Widget for ImageCard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_style = if self.is_latest {
            Style::default().fg(Color::Magenta)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title(self.caption())
            .title_style(border_style.add_modifier(Modifier::BOLD));
        let inner = block.inner(area);
        block.render(area, buf);

        ThumbnailView::new(&self.image.thumbnail).render(inner, buf);
    }
}

/// Half-block renderer for a [`Thumbnail`].
pub struct ThumbnailView<'a> {
    thumbnail: &'a Thumbnail,
}

impl<'a> ThumbnailView<'a> {
    pub fn new(thumbnail: &'a Thumbnail) -> Self {
        Self { thumbnail }
    }
}

impl Widget for ThumbnailView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let t = self.thumbnail;
        let cols = (t.width as u16).min(area.width);
        let rows = (t.height.div_ceil(2) as u16).min(area.height);

        for row in 0..rows {
            for col in 0..cols {
                let top = t.pixel(col as u32, row as u32 * 2);
                let bottom = t.pixel(col as u32, row as u32 * 2 + 1);
                let Some(cell) = buf.cell_mut((area.x + col, area.y + row)) else {
                    continue;
                };
                cell.set_symbol("▀");
                if let Some([r, g, b]) = top {
                    cell.set_fg(Color::Rgb(r, g, b));
                }
                // Odd height: last row keeps the terminal background
                cell.set_bg(match bottom {
                    Some([r, g, b]) => Color::Rgb(r, g, b),
                    None => Color::Reset,
                });
            }
        }
    }
}

fn format_bytes(len: usize) -> String {
    if len >= 1024 * 1024 {
        format!("{:.1} MB", len as f64 / (1024.0 * 1024.0))
    } else if len >= 1024 {
        format!("{:.1} KB", len as f64 / 1024.0)
    } else {
        format!("{len} B")
    }
}
