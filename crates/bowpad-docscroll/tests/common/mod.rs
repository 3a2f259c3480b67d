#![allow(dead_code)]

use bowpad_config::Rgb;
use bowpad_docscroll::{OverviewCanvas, PixelPoint, PixelRect, ThumbStroke};

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Rect(PixelRect, Rgb),
    Triangle([PixelPoint; 3], Rgb),
    Thumb(PixelRect, Rgb, ThumbStroke),
}

/// Canvas that records every call; `fail_after` makes the n-th call fail.
#[derive(Debug, Default)]
pub struct RecordingCanvas {
    pub ops: Vec<DrawOp>,
    pub fail_after: Option<usize>,
}

impl RecordingCanvas {
    pub fn failing_after(n: usize) -> Self {
        Self {
            ops: Vec::new(),
            fail_after: Some(n),
        }
    }

    fn record(&mut self, op: DrawOp) -> anyhow::Result<()> {
        if self.fail_after.is_some_and(|n| self.ops.len() >= n) {
            anyhow::bail!("backend gone");
        }
        self.ops.push(op);
        Ok(())
    }

    pub fn rects(&self) -> Vec<(PixelRect, Rgb)> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Rect(r, c) => Some((*r, *c)),
                _ => None,
            })
            .collect()
    }
}

impl OverviewCanvas for RecordingCanvas {
    fn fill_rect(&mut self, rect: PixelRect, color: Rgb) -> anyhow::Result<()> {
        self.record(DrawOp::Rect(rect, color))
    }

    fn fill_triangle(&mut self, points: [PixelPoint; 3], color: Rgb) -> anyhow::Result<()> {
        self.record(DrawOp::Triangle(points, color))
    }

    fn draw_thumb(&mut self, rect: PixelRect, color: Rgb, stroke: ThumbStroke) -> anyhow::Result<()> {
        self.record(DrawOp::Thumb(rect, color, stroke))
    }
}
