use glam::Mat4;

use super::{Capabilities, DeviceError};

/// Which transform the matrix calls act on.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub enum MatrixMode {
    Projection,
    #[default]
    ModelView,
}

#[derive(Debug, Clone)]
struct Stack {
    current: Mat4,
    saved: Vec<Mat4>,
    max_depth: usize,
}

impl Stack {
    fn new(max_depth: usize) -> Self {
        Self {
            current: Mat4::IDENTITY,
            saved: Vec::with_capacity(max_depth),
            max_depth,
        }
    }
}

/// Software model of the rasterizer's projection + modelview stacks.
///
/// Hardware keeps these on-chip; backends that emulate the device (headless,
/// preview) keep one of these instead. Depth limits come from [`Capabilities`],
/// so a push that would overflow the real stack fails here too.
#[derive(Debug, Clone)]
pub struct MatrixStack {
    mode: MatrixMode,
    projection: Stack,
    modelview: Stack,
}

impl MatrixStack {
    pub fn new(projection_depth: usize, modelview_depth: usize) -> Self {
        Self {
            mode: MatrixMode::default(),
            projection: Stack::new(projection_depth),
            modelview: Stack::new(modelview_depth),
        }
    }

    pub fn from_capabilities(caps: &Capabilities) -> Self {
        Self::new(caps.projection_stack_depth, caps.modelview_stack_depth)
    }

    #[inline]
    pub fn mode(&self) -> MatrixMode {
        self.mode
    }

    #[inline]
    pub fn set_mode(&mut self, mode: MatrixMode) {
        self.mode = mode;
    }

    pub fn load(&mut self, m: &Mat4) {
        self.active_mut().current = *m;
    }

    /// Post-multiplies the active matrix: `current = current * m`.
    pub fn mult(&mut self, m: &Mat4) {
        let s = self.active_mut();
        s.current *= *m;
    }

    pub fn push(&mut self) -> Result<(), DeviceError> {
        let mode = self.mode;
        let s = self.active_mut();
        if s.saved.len() >= s.max_depth {
            return Err(DeviceError::MatrixStackOverflow {
                mode,
                depth: s.max_depth,
            });
        }
        s.saved.push(s.current);
        Ok(())
    }

    pub fn pop(&mut self) -> Result<(), DeviceError> {
        let mode = self.mode;
        let s = self.active_mut();
        let Some(m) = s.saved.pop() else {
            return Err(DeviceError::MatrixStackUnderflow { mode });
        };
        s.current = m;
        Ok(())
    }

    pub fn current(&self, mode: MatrixMode) -> Mat4 {
        match mode {
            MatrixMode::Projection => self.projection.current,
            MatrixMode::ModelView => self.modelview.current,
        }
    }

    /// `projection * modelview`, the transform applied to submitted vertices.
    pub fn combined(&self) -> Mat4 {
        self.projection.current * self.modelview.current
    }

    fn active_mut(&mut self) -> &mut Stack {
        match self.mode {
            MatrixMode::Projection => &mut self.projection,
            MatrixMode::ModelView => &mut self.modelview,
        }
    }
}
