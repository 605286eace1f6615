//! 推論性能の計測
//!
//! 直近 N 回の推論時間から平均とFPSを求める。

use std::collections::VecDeque;
use std::time::Duration;
use vision_helper_common::PerformanceMetrics;

const DEFAULT_WINDOW: usize = 30;

#[derive(Debug, Clone)]
pub struct PerformanceTracker {
    samples: VecDeque<Duration>,
    window: usize,
}

impl Default for PerformanceTracker {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW)
    }
}

impl PerformanceTracker {
    pub fn new(window: usize) -> Self {
        let window = window.max(1);
        Self {
            samples: VecDeque::with_capacity(window),
            window,
        }
    }

    /// 推論1回分の所要時間を記録
    pub fn record(&mut self, elapsed: Duration) {
        if self.samples.len() == self.window {
            self.samples.pop_front();
        }
        self.samples.push_back(elapsed);
    }

    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }

    /// 平均推論時間（ms）。記録なしは 0
    pub fn average_inference_ms(&self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        let total: Duration = self.samples.iter().sum();
        total.as_secs_f64() * 1000.0 / self.samples.len() as f64
    }

    /// 平均推論時間から求めたFPS。記録なしは 0
    pub fn frames_per_second(&self) -> f32 {
        let average = self.average_inference_ms();
        if average <= 0.0 {
            return 0.0;
        }
        (1000.0 / average) as f32
    }

    /// 現在の値でメトリクスを作成
    pub fn snapshot(&self, model_name: &str) -> PerformanceMetrics {
        PerformanceMetrics {
            device_info: device_info(),
            os_version: os_version(),
            model_name: model_name.to_string(),
            average_inference_time_ms: self.average_inference_ms().round() as u64,
            frames_per_second: self.frames_per_second(),
        }
    }
}

/// 実行環境の概要
pub fn device_info() -> String {
    format!("{} ({})", std::env::consts::OS, std::env::consts::ARCH)
}

pub fn os_version() -> String {
    format!("{} {}", std::env::consts::FAMILY, std::env::consts::OS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_tracker() {
        let tracker = PerformanceTracker::default();
        assert_eq!(tracker.average_inference_ms(), 0.0);
        assert_eq!(tracker.frames_per_second(), 0.0);
        assert_eq!(tracker.snapshot("m").average_inference_time_ms, 0);
    }

    #[test]
    fn test_average_and_fps() {
        let mut tracker = PerformanceTracker::default();
        tracker.record(Duration::from_millis(40));
        tracker.record(Duration::from_millis(60));
        assert!((tracker.average_inference_ms() - 50.0).abs() < 1e-9);
        assert!((tracker.frames_per_second() - 20.0).abs() < 1e-4);

        let metrics = tracker.snapshot("mobilenet_v1_1.0_224_quant");
        assert_eq!(metrics.average_inference_time_ms, 50);
        assert_eq!(metrics.model_name, "mobilenet_v1_1.0_224_quant");
        assert!(!metrics.device_info.is_empty());
    }

    #[test]
    fn test_window_drops_oldest() {
        let mut tracker = PerformanceTracker::new(2);
        tracker.record(Duration::from_millis(1000));
        tracker.record(Duration::from_millis(10));
        tracker.record(Duration::from_millis(30));
        assert_eq!(tracker.sample_count(), 2);
        assert!((tracker.average_inference_ms() - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_window_is_clamped() {
        let mut tracker = PerformanceTracker::new(0);
        tracker.record(Duration::from_millis(5));
        assert_eq!(tracker.sample_count(), 1);
    }
}
