//! Mirror relationships between monitors

use std::collections::{HashMap, HashSet};

use crate::types::Monitor;

/// Whether making `target` mirror `source` would close a mirror loop
///
/// Follows the existing chain starting at `source`; reaching `target` (or
/// revisiting any monitor) means a cycle.
pub fn would_create_cycle(target: &str, source: &str, monitors: &[Monitor]) -> bool {
    let chain: HashMap<&str, &str> = monitors
        .iter()
        .filter_map(|m| m.mirror_source.as_deref().map(|src| (m.name.as_str(), src)))
        .collect();

    let mut visited = HashSet::new();
    let mut current = source;
    loop {
        if !visited.insert(current) || current == target {
            return true;
        }
        match chain.get(current) {
            Some(next) => current = *next,
            None => return false,
        }
    }
}

/// Monitors that may serve as mirror source for `target`
///
/// Active, not mirroring anything themselves, and not closing a loop.
pub fn eligible_sources<'a>(target: &str, monitors: &'a [Monitor]) -> Vec<&'a str> {
    monitors
        .iter()
        .filter(|m| m.name != target && m.active && !m.is_mirrored())
        .filter(|m| !would_create_cycle(target, &m.name, monitors))
        .map(|m| m.name.as_str())
        .collect()
}

/// Names of the monitors currently mirroring `source`
pub fn mirror_targets<'a>(source: &str, monitors: &'a [Monitor]) -> Vec<&'a str> {
    monitors
        .iter()
        .filter(|m| m.mirror_source.as_deref() == Some(source))
        .map(|m| m.name.as_str())
        .collect()
}

/// Human-readable problems with the current mirror setup
pub fn validate(monitors: &[Monitor]) -> Vec<String> {
    let by_name: HashMap<&str, &Monitor> = monitors.iter().map(|m| (m.name.as_str(), m)).collect();
    let mirrored = || {
        monitors
            .iter()
            .filter_map(|m| m.mirror_source.as_deref().and_then(|src| by_name.get(src).map(|s| (m, *s))))
    };

    let mut warnings: Vec<String> = mirrored()
        .filter(|(mon, source)| mon.width != source.width || mon.height != source.height)
        .map(|(mon, source)| {
            format!(
                "Resolution mismatch: {} ({}x{}) mirroring {} ({}x{})",
                mon.name, mon.width, mon.height, source.name, source.width, source.height
            )
        })
        .collect();

    warnings.extend(
        mirrored()
            .filter(|(_, source)| !source.active)
            .map(|(mon, source)| format!("Mirror source {} is disabled but {} is trying to mirror it", source.name, mon.name)),
    );

    warnings
}
