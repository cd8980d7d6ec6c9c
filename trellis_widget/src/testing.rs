// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared test doubles for the collaborator traits.

use alloc::vec::Vec;

use kurbo::Rect;

use crate::command::{Command, CommandBus};
use crate::paint::Painter;
use crate::state::WindowHost;
use crate::types::ColorId;

/// Bus that records everything posted.
#[derive(Debug, Default)]
pub(crate) struct RecordingBus {
    pub(crate) posted: Vec<Command>,
}

impl CommandBus for RecordingBus {
    fn post(&mut self, command: Command) {
        self.posted.push(command);
    }
}

/// Window host that records pointer-capture transitions.
#[derive(Debug, Default)]
pub(crate) struct CaptureHost {
    pub(crate) calls: Vec<bool>,
}

impl WindowHost for CaptureHost {
    fn set_pointer_capture(&mut self, active: bool) {
        self.calls.push(active);
    }
}

/// A painting operation recorded by [`RecordingPainter`].
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum PaintOp {
    Fill(Rect, ColorId),
    Frame(Rect, ColorId),
}

/// Painter that records fills and frames in call order.
#[derive(Debug, Default)]
pub(crate) struct RecordingPainter {
    pub(crate) ops: Vec<PaintOp>,
}

impl Painter for RecordingPainter {
    fn fill_rect(&mut self, rect: Rect, color: ColorId) {
        self.ops.push(PaintOp::Fill(rect, color));
    }

    fn frame_rect(&mut self, rect: Rect, _thickness: f64, color: ColorId) {
        self.ops.push(PaintOp::Frame(rect, color));
    }
}
