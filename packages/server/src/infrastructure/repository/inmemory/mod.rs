mod stage;

pub use stage::InMemoryStageRepository;
