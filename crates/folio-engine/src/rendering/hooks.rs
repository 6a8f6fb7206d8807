/// Upward notifications from rendered content.
///
/// Both are pure notifications: the renderer never navigates or mutates
/// anything itself. Implementations needing state use interior mutability.
pub trait RenderHooks {
    /// An image was activated; `src` is the resolved source.
    fn image_activated(&self, _src: &str) {}

    fn link_activated(&self, _href: &str) {}
}

/// Hooks that ignore every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHooks;

impl RenderHooks for NoHooks {}
