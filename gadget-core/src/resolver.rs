use crate::{
    error::GadgetError,
    model::{LocationCandidate, LocationQuery},
    provider::WeatherApi,
};

/// Resolves free-text city/country input into geocoded candidates.
///
/// The resolver remembers the last successfully resolved query so that a
/// repeat search (the user re-opening the options without editing the
/// fields) does not hit the network again. The cache holds at most one
/// entry and only a successful lookup populates it; a failed lookup clears
/// it so an identical retry goes back upstream.
#[derive(Debug)]
pub struct GeocodeResolver {
    api: Box<dyn WeatherApi>,
    last: Option<(LocationQuery, Vec<LocationCandidate>)>,
}

impl GeocodeResolver {
    pub fn new(api: Box<dyn WeatherApi>) -> Self {
        Self { api, last: None }
    }

    /// Resolve a query into an ordered candidate list.
    ///
    /// Returns `Ok(None)` without any network call when either field is
    /// empty. Candidate order is the upstream order; a position in the
    /// returned list is only meaningful against that exact list.
    pub async fn resolve(
        &mut self,
        query: &LocationQuery,
    ) -> Result<Option<Vec<LocationCandidate>>, GadgetError> {
        if !query.is_complete() {
            return Ok(None);
        }

        if let Some((cached_query, candidates)) = &self.last {
            if cached_query == query {
                tracing::debug!(city = %query.city, country = %query.country, "geocode cache hit");
                return Ok(Some(candidates.clone()));
            }
        }

        match self.api.geocode(query).await {
            Ok(candidates) => {
                self.last = Some((query.clone(), candidates.clone()));
                Ok(Some(candidates))
            }
            Err(err) => {
                tracing::warn!("geocoding failed: {err:#}");
                self.last = None;
                Err(GadgetError::upstream(&err))
            }
        }
    }
}
