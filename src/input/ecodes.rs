// Used event codes (input events as standardized in the linux kernel)
// See https://github.com/torvalds/linux/blob/master/include/uapi/linux/input-event-codes.h

// Event types
pub const EV_SYN: u16 = 0x00;
pub const EV_KEY: u16 = 0x01; // BTN prefixed constants are of type EV_KEY, too
pub const EV_ABS: u16 = 0x03;

// Absolute multitouch axes reported by the touch panel
pub const ABS_MT_POSITION_X: u16 = 0x35; // = 53
pub const ABS_MT_POSITION_Y: u16 = 0x36; // = 54
pub const ABS_MT_TRACKING_ID: u16 = 0x39; // = 57

// Contact presence as a button, for panels that report it this way
// instead of (or in addition to) a tracking id
pub const BTN_TOUCH: u16 = 0x14a; // = 330
