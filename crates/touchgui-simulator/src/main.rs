//! Desktop simulator for the touchgui engine.
//!
//! Runs a small demo application in an SDL2 window via
//! `embedded-graphics-simulator`. The left mouse button stands in for the
//! touch panel: press, drag and release behave like a finger.
//!
//! Screens:
//!
//! | Screen   | Shows                                                     |
//! |----------|-----------------------------------------------------------|
//! | main     | Animated meter driven by a task, dialog result, navigation |
//! | controls | Slider, knob, checkbox grey-out, button groups, dropdown  |
//! | dialog   | Dialog box returning the pressed button to its parent     |
//!
//! Closing the window shuts the GUI down.

use std::cell::RefCell;
use std::rc::Rc;

use embassy_futures::block_on;
use embassy_time::Duration;
use embedded_graphics::mono_font::ascii::FONT_6X10;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics_simulator::{
    OutputSettingsBuilder, SimulatorDisplay, SimulatorEvent, Window, sdl2::MouseButton,
};
use log::{error, info};

use touchgui_core::ui::styling::{BLUE, DARKGREEN, GREEN, GREY, LIGHTRED, RED, YELLOW};
use touchgui_core::ui::{
    Button, ButtonList, Checkbox, Dropdown, Knob, Label, Led, Listbox, Meter, RadioButtons,
    Slider, Value, Widget, WidgetId,
};
use touchgui_core::{
    Ctx, DialogBox, Gui, GuiConfig, GuiResult, ScreenBuilder, ScreenClass, ScreenHandler,
    ShutdownHandle, TaskPolicy, TouchPanel,
};

// ---------------------------------------------------------------------------
// Display constants
// ---------------------------------------------------------------------------

/// Pixel scale factor for the simulator window.
const WINDOW_SCALE: u32 = 2;

const DISPLAY_WIDTH: u32 = 320;
const DISPLAY_HEIGHT: u32 = 240;

/// Interval between meter updates on the main screen.
const METER_STEP: Duration = Duration::from_millis(250);

/// Divisor used for greyed-out colours
const GREY_FACTOR: f32 = 2.0;

// ---------------------------------------------------------------------------
// Mouse as touch panel
// ---------------------------------------------------------------------------

/// Reports the mouse position while the left button is held
struct MousePanel {
    window: Rc<RefCell<Window>>,
    pressed: Option<Point>,
    quit: ShutdownHandle,
}

impl TouchPanel for MousePanel {
    fn get_touch(&mut self) -> Option<touchgui_core::ui::TouchPoint> {
        for event in self.window.borrow_mut().events() {
            match event {
                SimulatorEvent::Quit => self.quit.shutdown(),
                SimulatorEvent::MouseButtonDown {
                    mouse_btn: MouseButton::Left,
                    point,
                } => self.pressed = Some(point),
                SimulatorEvent::MouseMove { point } if self.pressed.is_some() => {
                    self.pressed = Some(point)
                }
                SimulatorEvent::MouseButtonUp {
                    mouse_btn: MouseButton::Left,
                    ..
                } => self.pressed = None,
                _ => {}
            }
        }
        self.pressed
            .map(|p| touchgui_core::ui::TouchPoint::new(p.x.max(0) as u16, p.y.max(0) as u16))
    }
}

// ---------------------------------------------------------------------------
// Screens
// ---------------------------------------------------------------------------

/// Shows the outcome of the save dialog when the main screen comes back
struct MainHandler {
    status: WidgetId,
}

impl ScreenHandler for MainHandler {
    fn on_open(&mut self, ctx: &mut Ctx<'_>) {
        if let Some(result) = ctx.take_modal_result() {
            let text = result.as_text().unwrap_or_default();
            info!("Dialog closed: {}", text);
            ctx.set_text(self.status, text);
        }
    }
}

fn nav_button(b: &ScreenBuilder<'_>, x: i32, y: i32, text: &str) -> Button {
    Button::new(b.locn(x, y), 80, 24)
        .text(text)
        .fgcolor(BLUE)
        .litcolor(YELLOW)
}

fn main_screen() -> ScreenClass {
    ScreenClass::new("main", |b| {
        b.add(Label::new(b.locn(10, 8), "touchgui demo").fgcolor(YELLOW))?;
        let status = b
            .add(Label::new(b.locn(10, 30), "").width(120).fgcolor(GREEN))?
            .id();
        b.set_handler(MainHandler { status });

        let meter = b
            .add(
                Meter::new(b.locn(240, 40), 30, 140)
                    .divisions(4)
                    .legends(&["0", "50", "100"]),
            )?
            .id();
        b.spawn(TaskPolicy::CancelOnChange, move |link| async move {
            let mut step = 0u32;
            loop {
                let value = (step % 20) as f32 / 19.0;
                link.set_value(meter, Value::Fraction(value)).await?;
                step += 1;
                link.sleep(METER_STEP).await?;
            }
        });

        let controls = nav_button(b, 10, 60, "Controls");
        b.add(controls)?.callback(|ctx, _| ctx.change(controls_screen()));
        let dialog = nav_button(b, 10, 100, "Save...");
        b.add(dialog)?.callback(|ctx, _| match save_dialog() {
            Ok(class) => ctx.change(class),
            Err(e) => error!("Dialog not built: {}", e),
        });
        let quit = nav_button(b, 10, 140, "Quit").fgcolor(LIGHTRED);
        b.add(quit)?
            .callback(|_, _| info!("Hold to quit"))
            .long_press(|ctx, _| ctx.shutdown());
        Ok(())
    })
}

fn controls_screen() -> ScreenClass {
    ScreenClass::new("controls", |b| {
        let level = b
            .add(Meter::new(b.locn(280, 20), 20, 100).pointercolor(RED))?
            .id();
        let slider = b
            .add(Slider::horizontal(b.locn(10, 20), 200, 20).legends(&["0", "5", "10"]))?
            .callback(move |ctx, id| {
                if let Some(value) = ctx.value(id) {
                    ctx.set_value(level, value);
                }
            })
            .release_callback(|ctx, id| info!("Slider settled at {:?}", ctx.value(id)))
            .id();

        b.add(Label::new(b.locn(40, 62), "Lock slider"))?;
        b.add(Checkbox::new(b.locn(10, 60), 16).fillcolor(GREEN))?
            .callback(move |ctx, id| {
                let locked = ctx.value(id).and_then(|v| v.as_flag()).unwrap_or(false);
                ctx.set_greyed_out(slider, locked);
            });

        b.add(Label::new(b.locn(150, 62), "Desaturate"))?;
        b.add(Checkbox::new(b.locn(120, 60), 16))?
            .callback(|ctx, id| {
                let desaturate = ctx.value(id).and_then(|v| v.as_flag()).unwrap_or(false);
                if let Err(e) = ctx.set_grey_style(desaturate, GREY_FACTOR) {
                    error!("Grey style rejected: {}", e);
                }
            });

        let led = b.add(Led::new(b.locn(250, 150), 20).with_color(GREEN))?.id();
        let mut toggle = ButtonList::new(move |ctx: &mut Ctx<'_>, _, running: &bool| {
            ctx.set_value(led, Value::Flag(*running));
        });
        let start = nav_button(b, 10, 90, "Start").fgcolor(DARKGREEN);
        toggle.add_button(b, start, true)?;
        let stop = nav_button(b, 10, 90, "Stop").fgcolor(RED);
        toggle.add_button(b, stop, false)?;
        b.add_group(toggle);

        let mut colours =
            RadioButtons::new(YELLOW, move |ctx: &mut Ctx<'_>, _, colour: &Rgb565| {
                ctx.set_color(led, *colour);
            });
        for (n, (text, colour)) in [("Green", GREEN), ("Blue", BLUE), ("Grey", GREY)]
            .into_iter()
            .enumerate()
        {
            let face = Button::new(b.locn(10 + 60 * n as i32, 125), 54, 20).text(text);
            colours.add_button(b, face, colour)?;
        }
        b.add_group(colours);

        b.add(Listbox::new(b.locn(200, 60), 70, &["Slow", "Normal", "Fast"])?.selected(1))?
            .callback(|ctx, id| info!("Speed: {:?}", ctx.listbox_text(id)));

        b.add(Knob::new(b.locn(100, 155), 40).color(GREY))?
            .callback(move |ctx, id| {
                if let Some(value) = ctx.value(id) {
                    ctx.set_value(level, value);
                }
            });
        b.add(Dropdown::new(b.locn(150, 160), 90, &["Metric", "Imperial", "Nautical"])?)?
            .callback(|ctx, id| info!("Units: {:?}", ctx.listbox_text(id)));

        b.add(nav_button(b, 10, 200, "Back"))?.callback(|ctx, _| ctx.back());
        Ok(())
    })
}

fn save_dialog() -> GuiResult<ScreenClass> {
    let dialog = DialogBox::new(&FONT_6X10, &[("Saved", GREEN), ("Discarded", RED)])?
        .label("Save changes?")
        .location(Point::new(60, 60))
        .bgcolor(GREY);
    Ok(ScreenClass::dialog_box(dialog))
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn run() -> GuiResult<()> {
    let config = GuiConfig {
        width: DISPLAY_WIDTH,
        height: DISPLAY_HEIGHT,
        ..GuiConfig::default()
    };
    let mut gui = Gui::new(config)?;
    gui.change(main_screen())?;

    let mut display = SimulatorDisplay::<Rgb565>::new(Size::new(DISPLAY_WIDTH, DISPLAY_HEIGHT));
    let output_settings = OutputSettingsBuilder::new().scale(WINDOW_SCALE).build();
    let window = Rc::new(RefCell::new(Window::new("touchgui simulator", &output_settings)));

    let mut panel = MousePanel {
        window: window.clone(),
        pressed: None,
        quit: gui.shutdown_handle(),
    };

    // The SDL window is created by the first update, which happens in the
    // first present before any events are read
    block_on(gui.run(&mut panel, |canvas| {
        if let Err(e) = canvas.flush(&mut display) {
            error!("Flush failed: {:?}", e);
        }
        window.borrow_mut().update(&display);
    }))
}

fn main() {
    env_logger::init();
    info!("Starting touchgui simulator");
    info!(
        "Display: {}×{} (scale {}×)",
        DISPLAY_WIDTH, DISPLAY_HEIGHT, WINDOW_SCALE
    );

    if let Err(e) = run() {
        error!("Simulator stopped: {}", e);
    }
    info!("Simulator exiting");
}
