use leptos::*;

use crate::api::types::{ApiError, DashboardSummary, Role};
use crate::api::ApiClient;
use crate::components::error::InlineErrorMessage;
use crate::components::guard::RequireAuth;
use crate::components::layout::{LoadingSpinner, PageScaffold};
use crate::state::auth::use_auth;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Card {
    TotalMahasiswa,
    TotalDosen,
    DokumenPending,
    KrsSubmitted,
}

impl Card {
    fn label(&self) -> &'static str {
        match self {
            Card::TotalMahasiswa => "Total Mahasiswa",
            Card::TotalDosen => "Total Dosen",
            Card::DokumenPending => "Dokumen Menunggu",
            Card::KrsSubmitted => "KRS Diajukan",
        }
    }

    fn value(&self, summary: &DashboardSummary) -> i64 {
        match self {
            Card::TotalMahasiswa => summary.total_mahasiswa,
            Card::TotalDosen => summary.total_dosen,
            Card::DokumenPending => summary.dokumen_pending,
            Card::KrsSubmitted => summary.krs_submitted,
        }
    }
}

/// Which counters each role gets to see. Approvers see their queues,
/// administrative roles see the population counters as well.
pub fn cards_for(role: Role) -> Vec<Card> {
    match role {
        Role::Mahasiswa => vec![Card::DokumenPending],
        Role::Dosen => vec![Card::TotalMahasiswa, Card::DokumenPending],
        Role::Kaprodi => vec![Card::DokumenPending, Card::KrsSubmitted],
        Role::Dekan => vec![Card::TotalMahasiswa, Card::TotalDosen, Card::DokumenPending],
        Role::TuFakultas | Role::TuProdi | Role::Admin => vec![
            Card::TotalMahasiswa,
            Card::TotalDosen,
            Card::DokumenPending,
            Card::KrsSubmitted,
        ],
    }
}

#[component]
pub fn DashboardPage() -> impl IntoView {
    let (auth, _) = use_auth();
    let api = use_context::<ApiClient>().unwrap_or_default();

    // Keyed on the role so a login change supersedes any in-flight load.
    let load_error: RwSignal<Option<ApiError>> = create_rw_signal(None);
    let summary = create_resource(
        move || auth.get().role(),
        move |role| {
            let api = api.clone();
            async move {
                match role {
                    Some(role) => api.dashboard_summary(role).await.map(Some),
                    None => Ok(None),
                }
            }
        },
    );
    create_effect(move |_| {
        if let Some(result) = summary.get() {
            match result {
                Ok(_) => load_error.set(None),
                Err(err) => load_error.set(Some(err)),
            }
        }
    });

    view! {
        <RequireAuth>
            {move || view! {
                <PageScaffold title="Dasbor".to_string()>
                    <InlineErrorMessage error=load_error.into() />
                    <Suspense fallback=|| view! { <LoadingSpinner /> }>
                        {move || {
                            let role = auth.get().role();
                            summary.get().and_then(Result::ok).flatten().map(|data| {
                                let cards = role.map(cards_for).unwrap_or_default();
                                view! {
                                    <div class="grid grid-cols-1 sm:grid-cols-2 lg:grid-cols-4 gap-4">
                                        {cards
                                            .into_iter()
                                            .map(|card| {
                                                view! {
                                                    <div class="bg-surface-elevated rounded-2xl border border-border shadow-sm p-5">
                                                        <p class="text-xs font-bold uppercase tracking-wider text-fg-muted">
                                                            {card.label()}
                                                        </p>
                                                        <p class="text-3xl font-bold text-fg mt-2">
                                                            {card.value(&data)}
                                                        </p>
                                                    </div>
                                                }
                                            })
                                            .collect_view()}
                                    </div>
                                }
                            })
                        }}
                    </Suspense>
                </PageScaffold>
            }}
        </RequireAuth>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kaprodi_sees_both_approval_queues() {
        let cards = cards_for(Role::Kaprodi);
        assert!(cards.contains(&Card::DokumenPending));
        assert!(cards.contains(&Card::KrsSubmitted));
        assert!(!cards.contains(&Card::TotalDosen));
    }

    #[test]
    fn admin_sees_every_counter() {
        assert_eq!(cards_for(Role::Admin).len(), 4);
        assert_eq!(cards_for(Role::TuFakultas).len(), 4);
    }

    #[test]
    fn card_values_read_from_summary() {
        let summary = DashboardSummary {
            total_mahasiswa: 120,
            total_dosen: 15,
            dokumen_pending: 4,
            krs_submitted: 7,
        };
        assert_eq!(Card::TotalMahasiswa.value(&summary), 120);
        assert_eq!(Card::KrsSubmitted.value(&summary), 7);
    }
}
