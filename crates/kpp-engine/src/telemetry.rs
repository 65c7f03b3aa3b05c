// ─────────────────────────────────────────────────────────────────────
// KPP Kinetic Core — Tick Telemetry
// © 1998–2026 Miroslav Šotek. All rights reserved.
// ─────────────────────────────────────────────────────────────────────
//! Fixed-capacity circular buffers for per-tick telemetry.
//! Zero steady-state allocation inside the tick loop.

use kpp_types::state::TimeSeries;

/// A fixed-size circular buffer for one telemetry channel.
#[derive(Debug, Clone, PartialEq)]
pub struct Channel {
    data: Vec<f64>,
    capacity: usize,
    head: usize,
    count: usize,
}

impl Channel {
    pub fn new(capacity: usize) -> Self {
        Channel {
            data: vec![0.0; capacity],
            capacity,
            head: 0,
            count: 0,
        }
    }

    pub fn push(&mut self, value: f64) {
        self.data[self.head] = value;
        self.head = (self.head + 1) % self.capacity;
        if self.count < self.capacity {
            self.count += 1;
        }
    }

    /// Data in chronological order (oldest to newest).
    pub fn view(&self) -> Vec<f64> {
        let mut result = Vec::with_capacity(self.count);
        if self.count < self.capacity {
            result.extend_from_slice(&self.data[0..self.count]);
        } else {
            result.extend_from_slice(&self.data[self.head..self.capacity]);
            result.extend_from_slice(&self.data[0..self.head]);
        }
        result
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn clear(&mut self) {
        self.head = 0;
        self.count = 0;
    }
}

/// The three chart channels the external API exposes.
#[derive(Debug, Clone, PartialEq)]
pub struct TickRecorder {
    t_s: Channel,
    torque_nm: Channel,
    power_w: Channel,
}

impl TickRecorder {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        TickRecorder {
            t_s: Channel::new(capacity),
            torque_nm: Channel::new(capacity),
            power_w: Channel::new(capacity),
        }
    }

    pub fn push(&mut self, t_s: f64, torque_nm: f64, power_w: f64) {
        self.t_s.push(t_s);
        self.torque_nm.push(torque_nm);
        self.power_w.push(power_w);
    }

    /// Read-only snapshot for charting; never mutates state.
    pub fn snapshot(&self) -> TimeSeries {
        TimeSeries {
            t_s: self.t_s.view(),
            torque_nm: self.torque_nm.view(),
            power_w: self.power_w.view(),
        }
    }

    pub fn clear(&mut self) {
        self.t_s.clear();
        self.torque_nm.clear();
        self.power_w.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_before_wrap_is_chronological() {
        let mut ch = Channel::new(5);
        for v in [1.0, 2.0, 3.0] {
            ch.push(v);
        }
        assert_eq!(ch.view(), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_view_after_wrap_keeps_newest() {
        let mut ch = Channel::new(3);
        for v in [1.0, 2.0, 3.0, 4.0, 5.0] {
            ch.push(v);
        }
        assert_eq!(ch.view(), vec![3.0, 4.0, 5.0]);
        assert_eq!(ch.len(), 3);
    }

    #[test]
    fn test_recorder_channels_stay_in_lockstep() {
        let mut rec = TickRecorder::new(4);
        for i in 0..6 {
            let t = i as f64 * 0.05;
            rec.push(t, 100.0 + t, 10.0 * t);
        }
        let snap = rec.snapshot();
        assert_eq!(snap.t_s.len(), 4);
        assert_eq!(snap.torque_nm.len(), 4);
        assert_eq!(snap.power_w.len(), 4);
        // Oldest surviving sample is tick 2.
        assert!((snap.t_s[0] - 0.10).abs() < 1e-12);
    }

    #[test]
    fn test_clear_empties_without_reallocating() {
        let mut rec = TickRecorder::new(4);
        rec.push(0.0, 1.0, 2.0);
        rec.clear();
        let snap = rec.snapshot();
        assert!(snap.t_s.is_empty());
    }
}
