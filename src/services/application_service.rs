// src/services/application_service.rs
//
// Transaction boundary shared by the use cases.
//
// ORDER (on success):
// 1. start the unit of work
// 2. run the use case body
// 3. dispatch the domain events of every tracked aggregate to the bus
// 4. commit
// 5. publish integration events to the message broker
//
// Any failure before the commit rolls the unit of work back.

use std::sync::Arc;

use log::{debug, error, warn};

use crate::error::{AppError, AppResult};
use crate::events::{CatalogEvent, EventBus, MessageBroker};
use crate::repositories::UnitOfWork;

pub struct ApplicationService {
    uow: Arc<dyn UnitOfWork>,
    event_bus: Arc<EventBus>,
    message_broker: Arc<dyn MessageBroker>,
}

impl ApplicationService {
    pub fn new(
        uow: Arc<dyn UnitOfWork>,
        event_bus: Arc<EventBus>,
        message_broker: Arc<dyn MessageBroker>,
    ) -> Self {
        Self {
            uow,
            event_bus,
            message_broker,
        }
    }

    pub fn uow(&self) -> &dyn UnitOfWork {
        self.uow.as_ref()
    }

    pub fn run<T, F>(&self, work: F) -> AppResult<T>
    where
        F: FnOnce(&dyn UnitOfWork) -> AppResult<T>,
    {
        self.uow.start()?;

        let value = match work(self.uow.as_ref()) {
            Ok(value) => value,
            Err(err) => {
                self.rollback_after(&err);
                return Err(err);
            }
        };

        let events: Vec<CatalogEvent> = self
            .uow
            .aggregate_roots()
            .into_iter()
            .flat_map(|tracked| tracked.events)
            .collect();
        for event in &events {
            self.event_bus.dispatch(event);
        }

        self.uow.commit()?;
        debug!("Unit of work committed with {} domain events", events.len());

        for integration_event in events.iter().filter_map(CatalogEvent::integration_event) {
            if let Err(err) = self.message_broker.publish_event(&integration_event) {
                error!(
                    "Failed to publish {} after commit: {}",
                    integration_event.event_name, err
                );
                return Err(err);
            }
        }

        Ok(value)
    }

    fn rollback_after(&self, err: &AppError) {
        debug!("Rolling back unit of work: {}", err);
        if let Err(rollback_err) = self.uow.rollback() {
            warn!("Rollback failed after error '{}': {}", err, rollback_err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::video::{AudioVideoField, AudioVideoMedia, VideoAudioMediaReplaced};
    use crate::domain::{Video, VideoCreateCommand};
    use crate::error::AppError;
    use crate::events::{InMemoryMessageBroker, IntegrationEvent};
    use crate::repositories::InMemoryUnitOfWork;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Harness {
        uow: Arc<InMemoryUnitOfWork>,
        bus: Arc<EventBus>,
        broker: InMemoryMessageBroker,
        service: ApplicationService,
    }

    fn harness() -> Harness {
        let uow = Arc::new(InMemoryUnitOfWork::new());
        let bus = Arc::new(EventBus::new());
        let broker = InMemoryMessageBroker::new();
        let service = ApplicationService::new(
            uow.clone(),
            Arc::clone(&bus),
            Arc::new(broker.clone()),
        );
        Harness {
            uow,
            bus,
            broker,
            service,
        }
    }

    #[test]
    fn test_success_dispatches_commits_then_publishes() {
        let h = harness();
        let replaced = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&replaced);
        h.bus.subscribe::<VideoAudioMediaReplaced, _>(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let mut video = Video::fake().build();
        video.replace_trailer(AudioVideoMedia::create("t.mp4", "videos/x/videos"));
        let video_id = video.video_id;

        let result = h.service.run(|uow| {
            uow.add_aggregate_root(&video);
            Ok(video_id)
        });

        assert_eq!(result.unwrap(), video_id);
        assert_eq!(h.uow.commits(), 1);
        assert_eq!(replaced.load(Ordering::SeqCst), 1);

        let published: Vec<IntegrationEvent> = h.broker.published();
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].event_name, "VideoAudioMediaUploaded");
        assert_eq!(
            published[0].payload["resource_id"],
            format!("{}.{}", video_id, AudioVideoField::Trailer)
        );
    }

    #[test]
    fn test_failure_rolls_back_without_events() {
        let h = harness();

        let result: AppResult<()> = h
            .service
            .run(|_| Err(AppError::Other("boom".to_string())));

        assert!(result.is_err());
        assert_eq!(h.uow.rollbacks(), 1);
        assert_eq!(h.uow.commits(), 0);
        assert!(h.broker.published().is_empty());
        assert!(h.bus.get_event_log().is_empty());
    }

    #[test]
    fn test_domain_events_reach_the_bus_log() {
        let h = harness();
        let video = Video::create(VideoCreateCommand {
            title: "Heat".into(),
            description: "Crime".into(),
            year_launched: 1995,
            duration: 170,
            rating: Default::default(),
            is_opened: false,
            categories_id: vec![],
            genres_id: vec![],
            cast_members_id: vec![],
        })
        .unwrap();

        h.service
            .run(|uow| {
                uow.add_aggregate_root(&video);
                Ok(())
            })
            .unwrap();

        let log = h.bus.get_event_log();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].aggregate_id, video.video_id.to_string());
        assert!(h.broker.published().is_empty());
    }
}
