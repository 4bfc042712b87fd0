use std::time::{Duration, Instant};

use winit::{
    event::{ElementState, KeyboardInput, VirtualKeyCode, WindowEvent},
    event_loop::ControlFlow,
};

/// Where the render loop is. `Closing` is terminal.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum LoopState {
    Running,
    Closing,
}

impl LoopState {
    pub fn on_window_event(self, event: &WindowEvent<'_>) -> LoopState {
        if self == LoopState::Closing {
            return LoopState::Closing;
        }

        match event {
            WindowEvent::CloseRequested => LoopState::Closing,
            // Synthetic presses replay keys already held when focus arrives.
            WindowEvent::KeyboardInput {
                input,
                is_synthetic: false,
                ..
            } if is_close_key(input) => {
                log::debug!("escape pressed");
                LoopState::Closing
            }
            _ => LoopState::Running,
        }
    }

    pub fn is_running(&self) -> bool {
        *self == LoopState::Running
    }
}

pub fn is_close_key(input: &KeyboardInput) -> bool {
    input.state == ElementState::Pressed && input.virtual_keycode == Some(VirtualKeyCode::Escape)
}

/// How the loop waits once a frame has been presented.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FramePacing {
    /// Sleep until the platform delivers something.
    WaitForEvents,
    /// Like `WaitForEvents`, but wake up after at most this long.
    IdleTimeout(Duration),
    /// Never block.
    Poll,
}

impl FramePacing {
    pub fn control_flow(&self, now: Instant) -> ControlFlow {
        match self {
            FramePacing::WaitForEvents => ControlFlow::Wait,
            FramePacing::IdleTimeout(timeout) => ControlFlow::WaitUntil(now + *timeout),
            FramePacing::Poll => ControlFlow::Poll,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::event::{DeviceId, ModifiersState};

    #[allow(deprecated)]
    fn key(state: ElementState, keycode: VirtualKeyCode) -> KeyboardInput {
        KeyboardInput {
            scancode: 0,
            state,
            virtual_keycode: Some(keycode),
            modifiers: ModifiersState::empty(),
        }
    }

    fn key_event(input: KeyboardInput) -> WindowEvent<'static> {
        WindowEvent::KeyboardInput {
            device_id: unsafe { DeviceId::dummy() },
            input,
            is_synthetic: false,
        }
    }

    fn synthetic_key_event(input: KeyboardInput) -> WindowEvent<'static> {
        WindowEvent::KeyboardInput {
            device_id: unsafe { DeviceId::dummy() },
            input,
            is_synthetic: true,
        }
    }

    #[test]
    fn escape_press_closes() {
        let event = key_event(key(ElementState::Pressed, VirtualKeyCode::Escape));
        assert_eq!(
            LoopState::Running.on_window_event(&event),
            LoopState::Closing
        );
    }

    #[test]
    fn escape_held_on_focus_does_not_close() {
        let event = synthetic_key_event(key(ElementState::Pressed, VirtualKeyCode::Escape));
        assert_eq!(
            LoopState::Running.on_window_event(&event),
            LoopState::Running
        );
    }

    #[test]
    fn escape_release_does_not_close() {
        let event = key_event(key(ElementState::Released, VirtualKeyCode::Escape));
        assert_eq!(
            LoopState::Running.on_window_event(&event),
            LoopState::Running
        );
    }

    #[test]
    fn other_keys_do_not_close() {
        for code in [VirtualKeyCode::Q, VirtualKeyCode::Space, VirtualKeyCode::Return] {
            let event = key_event(key(ElementState::Pressed, code));
            assert!(LoopState::Running.on_window_event(&event).is_running());
        }
    }

    #[allow(deprecated)]
    #[test]
    fn key_without_virtual_code_is_ignored() {
        let input = KeyboardInput {
            scancode: 1,
            state: ElementState::Pressed,
            virtual_keycode: None,
            modifiers: ModifiersState::empty(),
        };
        assert!(!is_close_key(&input));
    }

    #[test]
    fn close_request_closes() {
        assert_eq!(
            LoopState::Running.on_window_event(&WindowEvent::CloseRequested),
            LoopState::Closing
        );
    }

    #[test]
    fn closing_is_terminal() {
        let events = [
            WindowEvent::Focused(true),
            key_event(key(ElementState::Released, VirtualKeyCode::Escape)),
            WindowEvent::Resized(winit::dpi::PhysicalSize::new(10, 10)),
        ];
        for event in &events {
            assert_eq!(
                LoopState::Closing.on_window_event(event),
                LoopState::Closing
            );
        }
    }

    #[test]
    fn unrelated_events_keep_running() {
        let resized = WindowEvent::Resized(winit::dpi::PhysicalSize::new(1024, 768));
        assert!(LoopState::Running.on_window_event(&resized).is_running());
        assert!(LoopState::Running
            .on_window_event(&WindowEvent::Focused(false))
            .is_running());
    }

    #[test]
    fn pacing_maps_to_control_flow() {
        let now = Instant::now();
        let timeout = Duration::from_millis(250);

        assert_eq!(
            FramePacing::WaitForEvents.control_flow(now),
            ControlFlow::Wait
        );
        assert_eq!(
            FramePacing::IdleTimeout(timeout).control_flow(now),
            ControlFlow::WaitUntil(now + timeout)
        );
        assert_eq!(FramePacing::Poll.control_flow(now), ControlFlow::Poll);
    }
}
