//! Stock modal screens
//!
//! [`DialogBox`] lays out a row of buttons, an optional label and a close
//! button in an aperture. Every button leaves its own text as the modal
//! result and closes the dialog; the close button leaves `"Close"`.
//!
//! The pop-up list of a [`Dropdown`] is also built here.
//!
//! ```ignore
//! let confirm = DialogBox::new(&FONT_6X10, &[("Yes", GREEN), ("No", RED)])?
//!     .label("Delete file?");
//! ctx.change(ScreenClass::dialog_box(confirm));
//! ```

use alloc::vec::Vec;

use embedded_graphics::mono_font::MonoFont;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;

use crate::error::{GuiError, GuiResult};
use crate::screens::context::Ctx;
use crate::screens::screen::{ApertureFrame, ScreenClass};
use crate::ui::components::{Button, Dropdown, Label, Listbox, Widget};
use crate::ui::core::{ScreenId, Text, Value, WidgetId, text};
use crate::ui::styling::{BLACK, DARKGREEN, RED, TextStyle};

const DIALOG_HEIGHT: u32 = 100;
/// Margin around and between buttons
const SPACING: u32 = 5;
const MIN_BUTTON_HEIGHT: u32 = 20;
/// Label baseline offset from the top of the dialog
const LABEL_TOP: i32 = 25;
/// Gap between the buttons and the bottom edge
const BUTTON_BOTTOM: u32 = 10;
/// Modal result left by the close button
pub const CLOSE_RESULT: &str = "Close";

/// Border between a dropdown's list aperture and its listbox
const LIST_BORDER: u32 = 1;

/// Button-based modal dialog
#[derive(Clone)]
pub struct DialogBox {
    font: &'static MonoFont<'static>,
    buttons: Vec<(Text, Rgb565)>,
    location: Point,
    label: Option<Text>,
    bgcolor: Rgb565,
    button_width: u32,
    close_button: bool,
}

impl DialogBox {
    /// One button per `(text, colour)` pair, left to right.
    ///
    /// Fails with [`GuiError::EmptyElementSet`] when `buttons` is empty.
    pub fn new(font: &'static MonoFont<'static>, buttons: &[(&str, Rgb565)]) -> GuiResult<Self> {
        if buttons.is_empty() {
            return Err(GuiError::EmptyElementSet);
        }
        Ok(Self {
            font,
            buttons: buttons.iter().map(|(t, c)| (text(t), *c)).collect(),
            location: Point::new(20, 20),
            label: None,
            bgcolor: DARKGREEN,
            button_width: 25,
            close_button: true,
        })
    }

    pub fn location(mut self, location: Point) -> Self {
        self.location = location;
        self
    }

    pub fn label(mut self, label: &str) -> Self {
        self.label = Some(text(label));
        self
    }

    pub fn bgcolor(mut self, color: Rgb565) -> Self {
        self.bgcolor = color;
        self
    }

    /// Minimum button width; buttons always fit their widest text
    pub fn button_width(mut self, width: u32) -> Self {
        self.button_width = width;
        self
    }

    pub fn close_button(mut self, enabled: bool) -> Self {
        self.close_button = enabled;
        self
    }

    fn text_width(&self, s: &str) -> u32 {
        TextStyle::extent(self.font, s).width
    }

    fn button_size(&self) -> Size {
        let widest = self
            .buttons
            .iter()
            .map(|(t, _)| self.text_width(t))
            .max()
            .unwrap_or_default();
        Size::new(
            (widest + 4).max(self.button_width),
            self.font.character_size.height.max(MIN_BUTTON_HEIGHT),
        )
    }

    /// Size of the aperture the dialog occupies
    pub fn size(&self) -> Size {
        let n = self.buttons.len() as u32;
        let mut width = SPACING + (self.button_size().width + SPACING) * n;
        if let Some(label) = &self.label {
            width = width.max(self.text_width(label) + 2 * SPACING);
        }
        Size::new(width, DIALOG_HEIGHT)
    }

    /// Left edges of the buttons relative to the dialog, spread over its
    /// width
    fn button_columns(&self) -> Vec<i32> {
        let n = self.buttons.len() as u32;
        let button = self.button_size().width;
        let gap = match n {
            0 | 1 => 0,
            _ => (self.size().width - 2 * SPACING).saturating_sub(n * button) / (n - 1),
        };
        (0..n)
            .map(|i| (SPACING + i * (button + gap)) as i32)
            .collect()
    }
}

fn close_with(ctx: &mut Ctx<'_>, result: &str) {
    ctx.set_modal_result(Value::text(result));
    ctx.back();
}

impl ScreenClass {
    /// Modal screen from a [`DialogBox`]
    pub fn dialog_box(dialog: DialogBox) -> ScreenClass {
        let size = dialog.size();
        let frame = ApertureFrame::new(dialog.location, size.width, size.height)
            .bgcolor(dialog.bgcolor);
        ScreenClass::aperture("dialog box", frame, move |b| {
            let font = dialog.font;
            let button = dialog.button_size();
            let top = (size.height - button.height - BUTTON_BOTTOM) as i32;
            if let Some(label) = &dialog.label {
                let label = Label::new(b.locn(SPACING as i32, LABEL_TOP), label)
                    .font(font)
                    .bgcolor(dialog.bgcolor);
                b.add(label)?;
            }
            for ((name, color), x) in dialog.buttons.iter().zip(dialog.button_columns()) {
                let result = name.clone();
                let face = Button::new(b.locn(x, top), button.width, button.height)
                    .text(name)
                    .font(font)
                    .fontcolor(BLACK)
                    .fgcolor(*color);
                b.add(face)?
                    .callback(move |ctx, _| close_with(ctx, &result));
            }
            if dialog.close_button {
                let cell = font.character_size;
                let side = cell.width.max(cell.height).max(MIN_BUTTON_HEIGHT);
                let x = (size.width - (side + 1)) as i32;
                let close = Button::new(b.locn(x, 1), side, side)
                    .text("X")
                    .font(font)
                    .fgcolor(RED);
                b.add(close)?
                    .callback(|ctx, _| close_with(ctx, CLOSE_RESULT));
            }
            Ok(())
        })
    }
}

/// Aperture listing a dropdown's entries just below it. Picking one closes
/// the list and hands the choice back to the dropdown on `parent`.
pub(crate) fn dropdown_list(parent: ScreenId, id: WidgetId, dropdown: &Dropdown) -> ScreenClass {
    let bounds = dropdown.base().bounds();
    let fg = dropdown.base().fgcolor();
    let bg = dropdown.base().bgcolor();
    let select_color = dropdown.highlight();
    let selected = dropdown.selected_index();
    let font = dropdown.requested_font();
    let entries: Vec<Text> = dropdown.elements().to_vec();

    let width = bounds.width().saturating_sub(bounds.height());
    let height = dropdown.entry_height() * entries.len() as u32 + 2 * LIST_BORDER;
    let frame = ApertureFrame::new(Point::new(bounds.x0, bounds.y1 + 1), width, height)
        .border(LIST_BORDER)
        .fgcolor(fg)
        .bgcolor(bg);

    ScreenClass::aperture("dropdown list", frame, move |b| {
        let names: Vec<&str> = entries.iter().map(|e| e.as_str()).collect();
        let inset = LIST_BORDER as i32;
        let mut listbox = Listbox::new(
            b.locn(inset, inset),
            width.saturating_sub(2 * LIST_BORDER),
            &names,
        )?
        .selected(selected)
        .select_color(select_color)
        .border(0)
        .fgcolor(fg)
        .bgcolor(bg);
        if let Some(font) = font {
            listbox = listbox.font(font);
        }
        b.add(listbox)?.callback(move |ctx, list| {
            if let Some(index) = ctx.value(list).and_then(|v| v.as_index()) {
                ctx.pick_dropdown(parent, id, index);
            }
            ctx.back();
        });
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::styling::GREEN;
    use embedded_graphics::mono_font::ascii::FONT_6X10;

    #[test]
    fn test_empty_dialog_rejected() {
        assert!(matches!(
            DialogBox::new(&FONT_6X10, &[]),
            Err(GuiError::EmptyElementSet)
        ));
    }

    #[test]
    fn test_width_fits_buttons_or_label() {
        let dialog = DialogBox::new(&FONT_6X10, &[("Yes", GREEN), ("No", RED)]).unwrap();
        // Buttons are 25 wide: 5 + 2 * (25 + 5)
        assert_eq!(dialog.size(), Size::new(65, DIALOG_HEIGHT));
        assert_eq!(dialog.button_columns(), [5, 35]);

        // "Cancel" is 36 pixels, so buttons grow to 40
        let dialog = DialogBox::new(&FONT_6X10, &[("Cancel", GREEN)]).unwrap();
        assert_eq!(dialog.button_size(), Size::new(40, MIN_BUTTON_HEIGHT));

        let dialog = DialogBox::new(&FONT_6X10, &[("Ok", GREEN)])
            .unwrap()
            .label("Overwrite the file?");
        assert_eq!(dialog.size().width, 19 * 6 + 2 * SPACING);
    }

    #[test]
    fn test_buttons_spread_under_wide_label() {
        let dialog = DialogBox::new(&FONT_6X10, &[("A", GREEN), ("B", RED), ("C", RED)])
            .unwrap()
            .label("A rather long question");
        let width = dialog.size().width;
        let columns = dialog.button_columns();
        assert_eq!(columns[0], SPACING as i32);
        // The last button ends within a gap's rounding of the right margin
        let right = columns[2] as u32 + 25;
        assert!(right <= width - SPACING && right + 2 >= width - SPACING);
    }
}
