/*!
 * Shard Configuration
 *
 * CPU-topology-aware shard counts for the engine's concurrent maps.
 * Every application thread touches the context-stack registry on each
 * composite monitor start/complete, so it is sized for high contention.
 */

use std::sync::OnceLock;
use tracing::{info, warn};

static SHARD_MANAGER: OnceLock<ShardManager> = OnceLock::new();

/// Hardware-aware shard configuration calculator
#[derive(Debug, Clone)]
pub struct ShardManager {
    cpu_count: usize,
}

impl ShardManager {
    fn instance() -> &'static Self {
        SHARD_MANAGER.get_or_init(|| {
            let cpu_count = std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or_else(|_| {
                    warn!("Failed to detect CPU count, defaulting to 8");
                    8
                });

            info!(cpu_count, "ShardManager initialized");
            Self { cpu_count }
        })
    }

    /// Calculate shard count for a given workload profile
    pub fn shards(profile: WorkloadProfile) -> usize {
        let base = Self::instance().cpu_count;

        let multiplier = match profile {
            // Per-context stacks: every instrumented thread, every composite monitor
            WorkloadProfile::HighContention => 4,
            // Inheritable markings: only composites that set inheritable attributes
            WorkloadProfile::MediumContention => 2,
            WorkloadProfile::LowContention => 1,
        };

        // DashMap requires a power of two
        (base * multiplier).next_power_of_two().clamp(8, 512)
    }

    /// Get the CPU count detected at initialization
    pub fn cpu_count() -> usize {
        Self::instance().cpu_count
    }
}

/// Workload characterization for shard count calculation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkloadProfile {
    /// Shard count: 4x CPU cores
    HighContention,
    /// Shard count: 2x CPU cores
    MediumContention,
    /// Shard count: 1x CPU cores
    LowContention,
}
