//! Gauges and labels of the status view.

use fakernet_types::SystemMetricsSnapshot;
use fakernet_util::{format_percent, format_usage};

use crate::view::{ElementId, GaugeStyle, RenderOp};

/// Values below these percentages render with [`GaugeStyle::Normal`].
pub const CPU_WARNING_PERCENT: f64 = 60.0;
pub const MEMORY_WARNING_PERCENT: f64 = 75.0;
pub const DISK_WARNING_PERCENT: f64 = 80.0;

/// `< threshold` is normal; the threshold itself is already a warning.
pub fn classify(percent: f64, threshold: f64) -> GaugeStyle {
    if percent < threshold { GaugeStyle::Normal } else { GaugeStyle::Warning }
}

/// Overwrite every metric element from one snapshot.
///
/// Memory and disk percentages are rounded to two decimals before they are
/// classified, so the displayed number and the styling always agree.
pub fn render_metrics(snapshot: &SystemMetricsSnapshot) -> Vec<RenderOp> {
    let memory = snapshot.memory_percent_rounded();
    let disk = snapshot.disk_percent_rounded();
    vec![
        RenderOp::SetText {
            target: ElementId::SystemName,
            text: snapshot.system.clone(),
        },
        gauge(ElementId::CpuGauge, snapshot.cpu_percent, CPU_WARNING_PERCENT),
        RenderOp::SetText {
            target: ElementId::MemoryDetails,
            text: format_usage(snapshot.memory_used, snapshot.memory_total),
        },
        gauge(ElementId::MemoryGauge, memory, MEMORY_WARNING_PERCENT),
        gauge(ElementId::DiskGauge, disk, DISK_WARNING_PERCENT),
        RenderOp::SetText {
            target: ElementId::DiskDetails,
            text: format_usage(snapshot.disk_used, snapshot.disk_total),
        },
    ]
}

fn gauge(target: ElementId, percent: f64, threshold: f64) -> RenderOp {
    RenderOp::SetGauge {
        target,
        percent,
        label: format!("{}%", format_percent(percent)),
        style: classify(percent, threshold),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(cpu: f64, memory_used: u64, disk_used: u64) -> SystemMetricsSnapshot {
        SystemMetricsSnapshot {
            system: "fn-host".into(),
            cpu_percent: cpu,
            memory_used,
            memory_total: 100_000,
            disk_used,
            disk_total: 100,
        }
    }

    fn style_of(ops: &[RenderOp], element: ElementId) -> Option<GaugeStyle> {
        ops.iter().find_map(|op| match op {
            RenderOp::SetGauge { target, style, .. } if *target == element => Some(*style),
            _ => None,
        })
    }

    #[test]
    fn thresholds_are_exclusive_on_the_normal_side() {
        assert_eq!(classify(79.99, DISK_WARNING_PERCENT), GaugeStyle::Normal);
        assert_eq!(classify(80.0, DISK_WARNING_PERCENT), GaugeStyle::Warning);
    }

    #[test]
    fn memory_is_classified_after_rounding() {
        // 74.999% displays as 75.00 and is styled as a warning.
        let ops = render_metrics(&snapshot(10.0, 74_999, 10));
        assert_eq!(style_of(&ops, ElementId::MemoryGauge), Some(GaugeStyle::Warning));
        let ops = render_metrics(&snapshot(10.0, 74_990, 10));
        assert_eq!(style_of(&ops, ElementId::MemoryGauge), Some(GaugeStyle::Normal));
    }

    #[test]
    fn every_element_is_overwritten() {
        let ops = render_metrics(&snapshot(12.5, 50_000, 85));
        assert_eq!(ops.len(), 6);
        assert_eq!(style_of(&ops, ElementId::DiskGauge), Some(GaugeStyle::Warning));
        assert!(ops.contains(&RenderOp::SetText {
            target: ElementId::SystemName,
            text: "fn-host".into()
        }));
    }
}
