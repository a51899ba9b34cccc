/// Sound requests for an external mixer. The level only decides *what*
/// plays and how loud; playback happens wherever the queue is drained.
#[derive(Debug, Clone)]
pub struct SfxManager {
    category: String,
    volume: f32,
    queued: Vec<String>,
}

impl SfxManager {
    pub fn new(category: &str) -> Self {
        Self {
            category: category.to_string(),
            volume: 100.0,
            queued: Vec::new(),
        }
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    /// Volume in `[0, 100]`.
    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 100.0);
    }

    pub fn play(&mut self, name: &str) {
        log::debug!("[{}] play '{}' at volume {:.0}", self.category, name, self.volume);
        self.queued.push(name.to_string());
    }

    pub fn queued(&self) -> &[String] {
        &self.queued
    }

    pub fn drain(&mut self) -> Vec<String> {
        std::mem::take(&mut self.queued)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn volume_is_clamped() {
        let mut sfx = SfxManager::new("level");
        sfx.set_volume(140.0);
        assert_eq!(sfx.volume(), 100.0);
        sfx.set_volume(-3.0);
        assert_eq!(sfx.volume(), 0.0);
    }

    #[test]
    fn play_queues_until_drained() {
        let mut sfx = SfxManager::new("level");
        sfx.play("portal");
        sfx.play("death");
        assert_eq!(sfx.queued(), ["portal".to_string(), "death".to_string()]);
        assert_eq!(sfx.drain().len(), 2);
        assert!(sfx.queued().is_empty());
    }
}
