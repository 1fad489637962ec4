use std::sync::Arc;

use tokio::sync::mpsc;

use crate::{
    client::{ConditionsClient, GeocodeClient},
    lookup::{LookupOutcome, LookupTicket, WeatherLookupOrchestrator},
    model::{LookupStatus, LookupTarget},
    selection::{self, Action, Key},
    suggest::{SuggestionBatch, SuggestionController, SuggestionSettings, SuggestionState},
};

/// Routes UI events to the suggestion and lookup controllers.
///
/// Returned [`LookupTicket`]s are the caller's to run; feed the outcome back
/// through [`WeatherSession::finish_lookup`].
#[derive(Debug)]
pub struct WeatherSession {
    suggestions: SuggestionController,
    lookup: WeatherLookupOrchestrator,
}

impl WeatherSession {
    pub fn new(
        geocoder: Arc<dyn GeocodeClient>,
        conditions: Arc<dyn ConditionsClient>,
        settings: SuggestionSettings,
    ) -> (Self, mpsc::UnboundedReceiver<SuggestionBatch>) {
        let lookup = WeatherLookupOrchestrator::new(
            Arc::clone(&geocoder),
            conditions,
            settings.language.clone(),
        );
        let (suggestions, batches) = SuggestionController::new(geocoder, settings);
        let session = Self {
            suggestions,
            lookup,
        };
        (session, batches)
    }

    pub fn query(&self) -> &str {
        self.suggestions.query()
    }

    pub fn suggestions(&self) -> &SuggestionState {
        self.suggestions.state()
    }

    pub fn status(&self) -> &LookupStatus {
        self.lookup.status()
    }

    pub fn on_query_changed(&mut self, query: &str) {
        self.suggestions.on_query_changed(query);
    }

    pub fn on_key(&mut self, key: Key) -> Option<LookupTicket> {
        match selection::on_key(key, self.suggestions.state()) {
            Action::Navigate(index) => {
                self.suggestions.highlight(index);
                None
            }
            Action::Commit(candidate) => {
                self.suggestions.set_query_text(&candidate.name);
                self.commit(LookupTarget::Place(candidate))
            }
            Action::CommitRawQuery => {
                let query = self.suggestions.query().trim().to_owned();
                self.commit(LookupTarget::Query(query))
            }
            Action::Dismiss => {
                self.suggestions.dismiss();
                None
            }
            Action::Ignore => None,
        }
    }

    /// Pointer selection of a suggestion row.
    pub fn click(&mut self, index: usize) -> Option<LookupTicket> {
        if !self.suggestions.state().is_visible() {
            return None;
        }
        let candidate = self.suggestions.state().items().get(index)?.clone();
        self.suggestions.set_query_text(&candidate.name);
        self.commit(LookupTarget::Place(candidate))
    }

    /// Focus left the input and the panel.
    pub fn blur(&mut self) {
        self.suggestions.dismiss();
    }

    pub fn apply_suggestions(&mut self, batch: SuggestionBatch) -> bool {
        self.suggestions.apply(batch)
    }

    pub fn finish_lookup(&mut self, outcome: LookupOutcome) -> bool {
        self.lookup.finish(outcome)
    }

    fn commit(&mut self, target: LookupTarget) -> Option<LookupTicket> {
        if matches!(&target, LookupTarget::Query(q) if q.is_empty()) {
            return None;
        }
        self.suggestions.dismiss();
        Some(self.lookup.begin(target))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        model::fixtures::{conditions, paris, place},
        testing::{FakeConditions, FakeGeocoder},
    };

    fn session(
        geocoder: &Arc<FakeGeocoder>,
        conditions: &Arc<FakeConditions>,
    ) -> (WeatherSession, mpsc::UnboundedReceiver<SuggestionBatch>) {
        WeatherSession::new(geocoder.clone(), conditions.clone(), SuggestionSettings::default())
    }

    async fn type_and_settle(
        session: &mut WeatherSession,
        batches: &mut mpsc::UnboundedReceiver<SuggestionBatch>,
        query: &str,
    ) {
        session.on_query_changed(query);
        let batch = batches.recv().await.unwrap();
        assert!(session.apply_suggestions(batch));
    }

    #[tokio::test(start_paused = true)]
    async fn enter_on_highlighted_candidate_skips_geocoding() {
        let geocoder = FakeGeocoder::new();
        geocoder.reply("Par", vec![paris(), place(2, "Parma", Some("Emilia-Romagna"), "Italy")]);
        let weather = FakeConditions::returning(conditions(18.4, 3));
        let (mut session, mut batches) = session(&geocoder, &weather);

        type_and_settle(&mut session, &mut batches, "Par").await;
        assert!(session.on_key(Key::ArrowDown).is_none());
        assert!(session.on_key(Key::ArrowDown).is_none());
        assert_eq!(session.suggestions().highlighted(), Some(1));

        let ticket = session.on_key(Key::Enter).expect("commit must start a lookup");
        assert!(session.status().is_loading());
        assert!(!session.suggestions().is_visible());
        assert_eq!(session.query(), "Parma");

        let outcome = ticket.run().await;
        assert!(session.finish_lookup(outcome));

        assert_eq!(geocoder.calls(), vec!["Par"]);
        let LookupStatus::Success(view) = session.status() else {
            panic!("expected success, got {:?}", session.status());
        };
        assert_eq!(view.location_label, "Parma, Emilia-Romagna, Italy");
    }

    #[tokio::test(start_paused = true)]
    async fn enter_without_highlight_geocodes_raw_text() {
        let geocoder = FakeGeocoder::new();
        geocoder.reply("Paris", vec![paris()]);
        let weather = FakeConditions::returning(conditions(18.4, 3));
        let (mut session, mut batches) = session(&geocoder, &weather);

        type_and_settle(&mut session, &mut batches, "Paris ").await;
        assert!(session.suggestions().is_visible());

        let ticket = session.on_key(Key::Enter).unwrap();
        assert_eq!(ticket.target(), &LookupTarget::Query("Paris".into()));

        session.finish_lookup(ticket.run().await);
        assert!(matches!(session.status(), LookupStatus::Success(_)));
        assert_eq!(geocoder.counts(), vec![5, 1]);
    }

    #[tokio::test(start_paused = true)]
    async fn committing_suppresses_pending_suggestions() {
        let geocoder = FakeGeocoder::new();
        geocoder.reply("Paris", vec![paris()]);
        let weather = FakeConditions::returning(conditions(18.4, 3));
        let (mut session, mut batches) = session(&geocoder, &weather);

        session.on_query_changed("Paris");
        let ticket = session.on_key(Key::Enter).unwrap();
        session.finish_lookup(ticket.run().await);

        tokio::time::sleep(std::time::Duration::from_secs(1)).await;
        assert!(batches.try_recv().is_err());
        assert!(!session.suggestions().is_visible());
        // Only the lookup's own geocode went out.
        assert_eq!(geocoder.counts(), vec![1]);
    }

    #[tokio::test(start_paused = true)]
    async fn blank_query_is_ignored() {
        let geocoder = FakeGeocoder::new();
        let weather = FakeConditions::returning(conditions(18.4, 3));
        let (mut session, _batches) = session(&geocoder, &weather);

        session.on_query_changed("   ");
        assert!(session.on_key(Key::Enter).is_none());
        assert_eq!(session.status(), &LookupStatus::Idle);
        assert!(geocoder.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn escape_hides_panel_and_keeps_text() {
        let geocoder = FakeGeocoder::new();
        geocoder.reply("Bern", vec![place(1, "Bern", Some("Bern"), "Switzerland")]);
        let weather = FakeConditions::returning(conditions(9.0, 2));
        let (mut session, mut batches) = session(&geocoder, &weather);

        type_and_settle(&mut session, &mut batches, "Bern").await;
        session.on_key(Key::ArrowDown);

        assert!(session.on_key(Key::Escape).is_none());
        assert!(!session.suggestions().is_visible());
        assert_eq!(session.suggestions().highlighted(), None);
        assert_eq!(session.query(), "Bern");
    }

    #[tokio::test(start_paused = true)]
    async fn click_commits_row() {
        let geocoder = FakeGeocoder::new();
        geocoder.reply("Spring", vec![
            place(1, "Springfield", Some("Illinois"), "United States"),
            place(2, "Springfield", Some("Missouri"), "United States"),
        ]);
        let weather = FakeConditions::returning(conditions(21.0, 0));
        let (mut session, mut batches) = session(&geocoder, &weather);

        assert!(session.click(0).is_none());
        type_and_settle(&mut session, &mut batches, "Spring").await;
        assert!(session.click(7).is_none());

        let ticket = session.click(1).unwrap();
        assert_eq!(
            ticket.target(),
            &LookupTarget::Place(place(2, "Springfield", Some("Missouri"), "United States"))
        );
        assert!(!session.suggestions().is_visible());
        assert_eq!(session.query(), "Springfield");
    }

    #[tokio::test(start_paused = true)]
    async fn blur_dismisses() {
        let geocoder = FakeGeocoder::new();
        geocoder.reply("Bern", vec![place(1, "Bern", None, "Switzerland")]);
        let weather = FakeConditions::returning(conditions(9.0, 2));
        let (mut session, mut batches) = session(&geocoder, &weather);

        type_and_settle(&mut session, &mut batches, "Bern").await;
        session.blur();
        assert!(!session.suggestions().is_visible());
    }
}
