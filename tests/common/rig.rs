use line_follower::cycle::CycleIo;
use line_follower::hal::mock::{
    RecordingActuator, RecordingOverlay, ScriptedBattery, ScriptedFrameSource,
};
use line_follower::image::OwnedFrame;

/// Mock collaborators for driving a `FrameCycle`.
pub struct Rig {
    pub frames: ScriptedFrameSource,
    pub actuator: RecordingActuator,
    pub battery: ScriptedBattery,
    pub overlay: RecordingOverlay,
}

impl Rig {
    pub fn new(battery: ScriptedBattery) -> Self {
        Self {
            frames: ScriptedFrameSource::new(),
            actuator: RecordingActuator::new(),
            battery,
            overlay: RecordingOverlay::default(),
        }
    }

    pub fn with_frames(battery: ScriptedBattery, frames: impl IntoIterator<Item = OwnedFrame>) -> Self {
        let mut rig = Self::new(battery);
        rig.frames = ScriptedFrameSource::from_frames(frames);
        rig
    }

    pub fn io(&mut self) -> CycleIo<'_> {
        CycleIo {
            frames: &mut self.frames,
            actuator: &mut self.actuator,
            battery: &mut self.battery,
            overlay: &mut self.overlay,
        }
    }
}
