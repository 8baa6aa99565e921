//! Streaming artist → ticketing attraction identity matching.
//!
//! The provider's keyword search is fuzzy, so the exact streaming profile URL is
//! the only disambiguator. Provider result order breaks ties.

use std::collections::HashSet;

use crate::{
    error::AppResult,
    models::{ticketmaster::AttractionCandidate, NewArtist, TopArtist},
    services::providers::TicketingProvider,
};

/// Id of the first candidate whose profile URL equals `profile_url` exactly
pub fn match_attraction(candidates: &[AttractionCandidate], profile_url: &str) -> Option<String> {
    candidates
        .iter()
        .find(|candidate| candidate.profile_url.as_deref() == Some(profile_url))
        .map(|candidate| candidate.id.clone())
}

/// Searches the provider by name and confirms the hit by profile URL
pub async fn resolve_attraction_id(
    provider: &dyn TicketingProvider,
    name: &str,
    profile_url: &str,
) -> AppResult<Option<String>> {
    if name.trim().is_empty() || profile_url.trim().is_empty() {
        return Ok(None);
    }

    let candidates = provider.search_attractions(name).await?;
    Ok(match_attraction(&candidates, profile_url))
}

/// Why an artist was left out of event ingestion
#[derive(Debug, Clone, PartialEq)]
pub enum UnresolvedReason {
    /// No name or no streaming profile URL to match on
    MissingIdentity,
    /// No candidate carried the exact profile URL
    NoMatch,
    /// An earlier artist in the same batch already claimed this attraction id
    DuplicateAttraction(String),
    /// The attraction search itself failed
    LookupFailed(String),
}

/// Per-artist result of identity resolution
#[derive(Debug, Clone, PartialEq)]
pub enum ResolutionOutcome {
    Resolved(NewArtist),
    Unresolved {
        name: String,
        reason: UnresolvedReason,
    },
}

/// Outcome of resolving a batch of top artists, in input order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolutionReport {
    pub outcomes: Vec<ResolutionOutcome>,
}

impl ResolutionReport {
    /// Artists ready to be stored, in input order
    pub fn resolved(&self) -> impl Iterator<Item = &NewArtist> {
        self.outcomes.iter().filter_map(|outcome| match outcome {
            ResolutionOutcome::Resolved(artist) => Some(artist),
            ResolutionOutcome::Unresolved { .. } => None,
        })
    }

    pub fn resolved_count(&self) -> usize {
        self.resolved().count()
    }

    pub fn unresolved_count(&self) -> usize {
        self.outcomes.len() - self.resolved_count()
    }
}

/// Resolves every top artist, recording one outcome per artist.
///
/// Never fails as a whole: a failed search only marks that artist unresolved.
pub async fn resolve_artists(
    provider: &dyn TicketingProvider,
    artists: &[TopArtist],
) -> ResolutionReport {
    let mut report = ResolutionReport::default();
    let mut claimed: HashSet<String> = HashSet::new();

    for artist in artists {
        let outcome = match resolve_one(provider, artist).await {
            Ok(Some(new_artist)) => {
                let attraction_id = new_artist.attraction_id.clone().unwrap_or_default();
                if claimed.insert(attraction_id.clone()) {
                    ResolutionOutcome::Resolved(new_artist)
                } else {
                    unresolved(artist, UnresolvedReason::DuplicateAttraction(attraction_id))
                }
            }
            Ok(None) if artist.external_url.is_none() => {
                unresolved(artist, UnresolvedReason::MissingIdentity)
            }
            Ok(None) => unresolved(artist, UnresolvedReason::NoMatch),
            Err(e) => unresolved(artist, UnresolvedReason::LookupFailed(e.to_string())),
        };

        if let ResolutionOutcome::Unresolved { name, reason } = &outcome {
            tracing::info!(
                artist = %name,
                reason = ?reason,
                provider = provider.name(),
                "Could not resolve ticketing attraction id"
            );
        }

        report.outcomes.push(outcome);
    }

    tracing::info!(
        resolved = report.resolved_count(),
        unresolved = report.unresolved_count(),
        "Artist identity resolution completed"
    );

    report
}

async fn resolve_one(
    provider: &dyn TicketingProvider,
    artist: &TopArtist,
) -> AppResult<Option<NewArtist>> {
    let Some(profile_url) = artist.external_url.as_deref() else {
        return Ok(None);
    };

    let attraction_id = resolve_attraction_id(provider, &artist.name, profile_url).await?;

    Ok(attraction_id.map(|id| NewArtist {
        name: artist.name.clone(),
        external_profile_id: artist.external_id.clone(),
        external_profile_url: profile_url.to_string(),
        image_url: artist.image_url.clone(),
        attraction_id: Some(id),
    }))
}

fn unresolved(artist: &TopArtist, reason: UnresolvedReason) -> ResolutionOutcome {
    ResolutionOutcome::Unresolved {
        name: artist.name.clone(),
        reason,
    }
}
