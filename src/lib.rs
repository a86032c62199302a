#![no_std]

pub mod bulb;
pub mod channel;
pub mod color;
pub mod config;
pub mod device;
pub mod filter;
pub mod frame;
pub mod frame_scheduler;
pub mod transition;

pub use bulb::{BulbConfig, BulbPayload, BulbTransport, BulbWorker, SubmitOutcome};
pub use config::{ConfigError, DriverConfig};
pub use device::{DeviceError, DeviceWriter, OpenMode, SerialLink};
pub use filter::{FilterConfig, OutputFilters};
pub use frame::{ChannelOrder, EncodeError, Frame, FrameEncoder, FrameHeader, frame_len};
pub use frame_scheduler::{
    DriverEvent, EventChannel, EventReceiver, EventSender, FrameResult, FrameScheduler,
    TickStatus,
};
pub use transition::{LedTransition, TransitionEngine};

pub use color::{Lab, LabInt, Rgb, Rgb12, Xyz};
pub use embassy_time::{Duration, Instant};
