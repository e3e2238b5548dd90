use std::path::PathBuf;

use anyhow::Context as _;
use dvis_stats::range_frame::{RangeFrame, RangeSegment, ScatterFrame};
use serde::{Deserialize, Serialize};

use crate::util::{self, Output};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct RangeFrameArg {
    /// JSON file holding one axis `[..]` or a scatter plot `{"x": [..], "y": [..]}` (stdin if omitted or `-`)
    input: Option<PathBuf>,
    /// Pull in frame ends lying far outside the interquartile range
    #[arg(long)]
    trim: bool,
    /// Half width of the break around the median, in data units
    #[arg(long, default_value_t = 0.0)]
    gap: f64,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
enum FrameInput {
    Axis(Vec<f64>),
    Scatter { x: Vec<f64>, y: Vec<f64> },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
struct AxisReport {
    #[serde(flatten)]
    frame: RangeFrame,
    ticks: [f64; 5],
    segments: [RangeSegment; 4],
}

impl AxisReport {
    fn new(frame: RangeFrame, gap: f64) -> Self {
        Self {
            frame,
            ticks: frame.ticks(),
            segments: frame.segments(gap),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
enum FrameOutput {
    Axis(AxisReport),
    Scatter { x: AxisReport, y: AxisReport },
}

pub(crate) fn run(arg: &RangeFrameArg) -> anyhow::Result<()> {
    let input: FrameInput = util::read_json_input("range frame input", arg.input.as_deref())?;
    let output = build(&input, arg.trim, arg.gap)?;
    Output::save_json(&output, arg.output.as_deref())
}

fn build(input: &FrameInput, trim: bool, gap: f64) -> anyhow::Result<FrameOutput> {
    let output = match input {
        FrameInput::Axis(values) => {
            let frame = RangeFrame::new(values, trim).context("Failed to compute range frame")?;
            FrameOutput::Axis(AxisReport::new(frame, gap))
        }
        FrameInput::Scatter { x, y } => {
            let frame =
                ScatterFrame::new(x, y, trim).context("Failed to compute scatter range frame")?;
            FrameOutput::Scatter {
                x: AxisReport::new(frame.x, gap),
                y: AxisReport::new(frame.y, gap),
            }
        }
    };
    Ok(output)
}
