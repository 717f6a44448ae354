//! Tests for the race-free strategies that finish within one tick
