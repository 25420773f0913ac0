#![allow(dead_code)]

use analog_core::memory::MemoryBackend;
use analog_core::user::Actor;

pub fn get_backend() -> MemoryBackend {
    MemoryBackend::new()
}

pub fn test_actor() -> Actor {
    Actor::new("user-1", "quiet_walker_7")
}

pub fn other_actor() -> Actor {
    Actor::new("user-2", "paper_rambler_12")
}

pub fn moderator_actor() -> Actor {
    Actor::new("mod-1", "steady_lantern_3")
}
