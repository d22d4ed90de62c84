//! Touch panel sampling
//!
//! The panel is read once per tick. Some resistive controllers report a
//! wrong first coordinate, so a touch-down transition is re-sampled after
//! the debounce delay and the second reading wins when the panel is still
//! touched.

use embassy_time::{Duration, Timer};

use crate::ui::core::{TouchEvent, TouchPoint};

/// Source of raw touch samples
pub trait TouchPanel {
    /// One non-blocking sample: `Some` while the panel is touched
    fn get_touch(&mut self) -> Option<TouchPoint>;
}

impl<T: TouchPanel + ?Sized> TouchPanel for &mut T {
    fn get_touch(&mut self) -> Option<TouchPoint> {
        (**self).get_touch()
    }
}

/// Turns raw samples into press, drag and release events
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    touched: bool,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            touched: false,
        }
    }

    /// Whether the last sample was a touch
    pub fn is_touched(&self) -> bool {
        self.touched
    }

    /// Read one sample. Returns `None` while the panel stays untouched.
    pub async fn sample<P: TouchPanel + ?Sized>(&mut self, panel: &mut P) -> Option<TouchEvent> {
        match panel.get_touch() {
            Some(first) if !self.touched => {
                if self.delay > Duration::from_ticks(0) {
                    Timer::after(self.delay).await;
                }
                let point = panel.get_touch().unwrap_or(first);
                self.touched = true;
                Some(TouchEvent::Press(point))
            }
            Some(point) => Some(TouchEvent::Drag(point)),
            None if self.touched => {
                self.touched = false;
                Some(TouchEvent::Release)
            }
            None => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::collections::VecDeque;
    use alloc::vec;
    use embassy_futures::block_on;

    struct Scripted(VecDeque<Option<TouchPoint>>);

    impl TouchPanel for Scripted {
        fn get_touch(&mut self) -> Option<TouchPoint> {
            self.0.pop_front().flatten()
        }
    }

    #[test]
    fn test_press_uses_second_sample() {
        let mut panel = Scripted(VecDeque::from(vec![
            Some(TouchPoint::new(1, 1)),
            Some(TouchPoint::new(25, 10)),
            Some(TouchPoint::new(26, 11)),
            None,
            None,
        ]));
        let mut debouncer = Debouncer::new(Duration::from_ticks(0));

        let events = block_on(async {
            let mut events = vec![];
            for _ in 0..4 {
                events.push(debouncer.sample(&mut panel).await);
            }
            events
        });
        assert_eq!(
            events,
            vec![
                Some(TouchEvent::Press(TouchPoint::new(25, 10))),
                Some(TouchEvent::Drag(TouchPoint::new(26, 11))),
                Some(TouchEvent::Release),
                None,
            ]
        );
    }

    #[test]
    fn test_bounce_keeps_first_sample() {
        let mut panel = Scripted(VecDeque::from(vec![Some(TouchPoint::new(7, 8)), None]));
        let mut debouncer = Debouncer::new(Duration::from_ticks(0));
        let event = block_on(debouncer.sample(&mut panel));
        assert_eq!(event, Some(TouchEvent::Press(TouchPoint::new(7, 8))));
        assert!(debouncer.is_touched());
    }
}
