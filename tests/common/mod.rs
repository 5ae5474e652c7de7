#![allow(dead_code)]

pub mod rig;
pub mod synthetic_frame;
