use super::statistics::GenerationStats;
use log::info;

pub trait ProgressCallback: Send {
    fn on_generation_start(&mut self, generation: usize);
    fn on_generation_complete(&mut self, stats: &GenerationStats, hall_of_fame_size: usize);
}

/// Logs one line per generation
pub struct ConsoleProgressCallback;

impl ProgressCallback for ConsoleProgressCallback {
    fn on_generation_start(&mut self, _generation: usize) {}

    fn on_generation_complete(&mut self, stats: &GenerationStats, hall_of_fame_size: usize) {
        info!(
            "gen {:>4}  avg {:>10.4}  std {:>10.4}  min {:>10.4}  max {:>10.4}  evals {:>4}  hof {}",
            stats.generation,
            stats.fitness.avg,
            stats.fitness.std,
            stats.fitness.min,
            stats.fitness.max,
            stats.evaluations,
            hall_of_fame_size
        );
    }
}

/// Forwards progress to another thread
pub struct ChannelProgressCallback {
    sender: std::sync::mpsc::Sender<ProgressMessage>,
}

#[derive(Debug, Clone)]
pub enum ProgressMessage {
    GenerationStart(usize),
    GenerationComplete { stats: GenerationStats, hof_size: usize },
}

impl ChannelProgressCallback {
    pub fn new(sender: std::sync::mpsc::Sender<ProgressMessage>) -> Self {
        Self { sender }
    }
}

impl ProgressCallback for ChannelProgressCallback {
    fn on_generation_start(&mut self, generation: usize) {
        let _ = self.sender.send(ProgressMessage::GenerationStart(generation));
    }

    fn on_generation_complete(&mut self, stats: &GenerationStats, hall_of_fame_size: usize) {
        let _ = self.sender.send(ProgressMessage::GenerationComplete {
            stats: stats.clone(),
            hof_size: hall_of_fame_size,
        });
    }
}
