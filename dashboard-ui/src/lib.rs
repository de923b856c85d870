//! Patient dashboard components for a WebAssembly host.

pub mod chart;

#[cfg(target_arch = "wasm32")]
mod styles;

#[cfg(target_arch = "wasm32")]
mod wasm_ui {
    use std::rc::Rc;

    use crate::chart::{self, ChartScale};
    use crate::styles;
    use chrono::Local;
    use dashboard_client::{BasicAuth, NoAuth, PatientClient};
    use dashboard_core::{
        BloodPressureSeries, BloodPressureSummary, DashboardConfig, DashboardError,
        DashboardView, DetailView, DiagnosticRow, LabResultRow, LoadSlot, PatientSnapshot,
        PatientSummary, ProfileField, ProfileFieldKind, Reading, Route, ViewState, VitalCard,
        VitalKind,
    };
    use dashboard_records::{dashboard_for, detail_for, order_history, patient_list};
    use serde::Deserialize;
    use serde_wasm_bindgen::from_value;
    use wasm_bindgen::prelude::*;
    use web_sys::{console, Document, Element, Window};
    use yew::platform::spawn_local;
    use yew::prelude::*;

    /// Options accepted from the JavaScript host.
    #[derive(Deserialize, Default)]
    struct MountOptions {
        #[serde(default)]
        endpoint: Option<String>,
        #[serde(default)]
        username: Option<String>,
        #[serde(default)]
        password: Option<String>,
        #[serde(default)]
        active_patient: Option<String>,
        #[serde(default)]
        history_window: Option<usize>,
    }

    impl MountOptions {
        fn into_props(self, route: Route) -> DashboardAppProps {
            let mut config = DashboardConfig::default();
            if let Some(endpoint) = self.endpoint {
                config.endpoint = endpoint;
            }
            if let Some(window) = self.history_window {
                config.history_window = window;
            }
            config.active_patient = self.active_patient;

            let credentials = match (self.username, self.password) {
                (Some(username), Some(password)) => Some(Credentials { username, password }),
                _ => None,
            };

            DashboardAppProps {
                config,
                credentials,
                route,
            }
        }
    }

    #[derive(Clone, PartialEq)]
    pub struct Credentials {
        username: String,
        password: String,
    }

    #[derive(Properties, PartialEq)]
    pub struct DashboardAppProps {
        pub config: DashboardConfig,
        pub credentials: Option<Credentials>,
        pub route: Route,
    }

    type SnapshotState = ViewState<Rc<PatientSnapshot>>;

    #[function_component(DashboardApp)]
    fn dashboard_app(props: &DashboardAppProps) -> Html {
        use_effect_with((), |_| {
            if let Some(window) = web_sys::window() {
                if let Some(document) = window.document() {
                    if let Err(err) = styles::ensure_styles(&document) {
                        console::error_1(&err);
                    }
                }
            }
            || ()
        });

        let state = use_state(SnapshotState::default);
        let slot = use_mut_ref(LoadSlot::<Rc<PatientSnapshot>>::new);

        {
            let state = state.clone();
            let config = props.config.clone();
            let credentials = props.credentials.clone();
            use_effect_with(
                (props.config.clone(), props.credentials.clone()),
                move |_| {
                    let ticket = slot.borrow_mut().begin();
                    state.set(ViewState::Loading);

                    let pending = slot.clone();
                    spawn_local(async move {
                        let result = fetch_snapshot(&config, credentials).await;
                        let next = ViewState::from_result(result.map(Rc::new));
                        if pending.borrow_mut().resolve(ticket, next.clone()) {
                            state.set(next);
                        } else {
                            log::debug!("Discarding patient response for a stale view");
                        }
                    });

                    move || slot.borrow_mut().unmount()
                },
            );
        }

        let body = match &*state {
            ViewState::Ready(snapshot) => render_ready(snapshot, &props.config, &props.route),
            other => render_state_message(other),
        };

        html! {
            <div class="dashboard-root">{ body }</div>
        }
    }

    async fn fetch_snapshot(
        config: &DashboardConfig,
        credentials: Option<Credentials>,
    ) -> Result<PatientSnapshot, DashboardError> {
        match credentials {
            Some(creds) => {
                PatientClient::new(
                    config.endpoint.clone(),
                    BasicAuth::new(creds.username, creds.password),
                )
                .fetch_snapshot(config)
                .await
            }
            None => {
                PatientClient::new(config.endpoint.clone(), NoAuth)
                    .fetch_snapshot(config)
                    .await
            }
        }
    }

    fn render_ready(snapshot: &PatientSnapshot, config: &DashboardConfig, route: &Route) -> Html {
        let patients = patient_list(snapshot, config);

        let (active_key, content) = match route {
            Route::Dashboard => match ViewState::from_result(dashboard_for(snapshot, config)) {
                ViewState::Ready(view) => (Some(view.patient.key.clone()), render_dashboard(&view)),
                other => (None, render_state_message(&other)),
            },
            Route::Detail(id) => match ViewState::from_result(detail_for(snapshot, id, config)) {
                ViewState::Ready(view) => (
                    Some(view.record.route_key().to_string()),
                    render_detail(&view),
                ),
                other => (None, render_state_message(&other)),
            },
            Route::Unknown => (None, render_status("Page not found", false)),
        };

        html! {
            <>
                <div class="dashboard-column">
                    { render_patient_list(&patients, active_key.as_deref()) }
                    <p class="patient-subtitle">{ format!("Updated {}", format_loaded_at(snapshot)) }</p>
                </div>
                <main>{ content }</main>
            </>
        }
    }

    fn format_loaded_at(snapshot: &PatientSnapshot) -> String {
        snapshot
            .loaded_at
            .with_timezone(&Local)
            .format("%b %d, %H:%M")
            .to_string()
    }

    fn render_state_message<T>(state: &ViewState<T>) -> Html {
        match state {
            ViewState::Loading => render_status("Loading...", false),
            ViewState::Failed(message) => render_status(message, true),
            ViewState::NotFound(message) => render_status(message, false),
            ViewState::Ready(_) => Html::default(),
        }
    }

    fn render_status(message: &str, is_error: bool) -> Html {
        html! {
            <div
                class={classes!("dashboard-status", is_error.then_some("is-error"))}
                role={if is_error { "alert" } else { "status" }}
            >
                { message.to_string() }
            </div>
        }
    }

    fn render_patient_list(patients: &[PatientSummary], active: Option<&str>) -> Html {
        html! {
            <aside class="dashboard-card">
                <h2>{"Patients"}</h2>
                <ul class="patient-list">
                    {
                        for patients.iter().map(|patient| {
                            let href = Route::Detail(patient.key.clone()).path();
                            let is_active = active == Some(patient.key.as_str());
                            html! {
                                <li>
                                    <a href={href} class={classes!(is_active.then_some("is-active"))}>
                                        { render_avatar(&patient.name, patient.profile_picture.as_deref(), false) }
                                        <span>
                                            <strong>{ patient.name.clone() }</strong>
                                            <br />
                                            <span class="patient-subtitle">{ patient.subtitle.clone() }</span>
                                        </span>
                                    </a>
                                </li>
                            }
                        })
                    }
                </ul>
            </aside>
        }
    }

    fn render_avatar(name: &str, picture: Option<&str>, large: bool) -> Html {
        let class = classes!("avatar", large.then_some("is-large"));
        match picture {
            Some(src) => html! { <img class={class} src={src.to_string()} alt={name.to_string()} /> },
            None => {
                let initial = name.chars().next().map(String::from).unwrap_or_default();
                html! { <span class={class} aria-hidden="true">{ initial }</span> }
            }
        }
    }

    fn render_dashboard(view: &DashboardView) -> Html {
        html! {
            <div class="dashboard-main">
                <div class="dashboard-column">
                    <section class="dashboard-card">
                        <h2>{"Diagnosis History"}</h2>
                        <div class="bp-card">
                            <div>
                                <h3>{"Blood Pressure"}</h3>
                                { render_blood_pressure_chart(&view.blood_pressure) }
                            </div>
                            { render_blood_pressure_legend(&view.latest_blood_pressure) }
                        </div>
                        <div class="vital-grid">
                            { for view.vitals.iter().map(render_vital_card) }
                        </div>
                    </section>
                    <section class="dashboard-card">
                        <h2>{"Diagnostic List"}</h2>
                        { render_diagnostics(&view.diagnostics) }
                    </section>
                </div>
                <div class="dashboard-column">
                    <section class="dashboard-card profile-card">
                        { render_avatar(&view.patient.name, view.patient.profile_picture.as_deref(), true) }
                        <h2>{ view.patient.name.clone() }</h2>
                        <ul class="profile-fields">
                            { for view.profile.iter().map(render_profile_field) }
                        </ul>
                        <a class="profile-action" href={Route::Detail(view.patient.key.clone()).path()}>
                            {"Show All Information"}
                        </a>
                    </section>
                    <section class="dashboard-card">
                        <h2>{"Lab Results"}</h2>
                        { render_lab_results(&view.lab_results) }
                    </section>
                </div>
            </div>
        }
    }

    fn render_detail(view: &DetailView) -> Html {
        let record = &view.record;
        let ordered = order_history(&record.diagnosis_history);

        html! {
            <div class="dashboard-column">
                <section class="dashboard-card detail-header">
                    { render_avatar(&view.display_name, record.profile_picture.as_deref(), true) }
                    <div>
                        <h2>{ view.display_name.clone() }</h2>
                        <p>{ format!("Date of Birth: {}", record.date_of_birth) }</p>
                        <p>{ format!("Gender: {}", record.gender) }</p>
                        <p>{ format!("Age: {}", record.age) }</p>
                        <p>{ format!("Contact: {}", record.phone_number) }</p>
                        <p>{ format!("Emergency Contact: {}", record.emergency_contact) }</p>
                        <p>{ format!("Insurance: {}", record.insurance_type) }</p>
                    </div>
                </section>
                <section class="dashboard-card">
                    <h2>{"Blood Pressure"}</h2>
                    { render_blood_pressure_chart(&view.blood_pressure) }
                </section>
                <section class="dashboard-card">
                    <h2>{"Diagnosis History"}</h2>
                    {
                        if ordered.entries.is_empty() {
                            html! { <p class="section-empty">{"No diagnosis history recorded"}</p> }
                        } else {
                            html! {
                                <table class="history-table">
                                    <thead>
                                        <tr>
                                            <th>{"Date"}</th>
                                            <th>{"Blood Pressure"}</th>
                                            <th>{"Heart Rate"}</th>
                                            <th>{"Respiratory Rate"}</th>
                                            <th>{"Temperature"}</th>
                                        </tr>
                                    </thead>
                                    <tbody>
                                        {
                                            for ordered.entries.iter().rev().map(|dated| {
                                                let bp = dated.entry.blood_pressure.as_ref();
                                                html! {
                                                    <tr>
                                                        <td>{ dated.label() }</td>
                                                        <td>{ format!(
                                                            "{}/{}",
                                                            format_reading(bp.and_then(|bp| bp.systolic.as_ref()), ""),
                                                            format_reading(bp.and_then(|bp| bp.diastolic.as_ref()), "")
                                                        ) }</td>
                                                        <td>{ format_reading(dated.entry.heart_rate.as_ref(), " bpm") }</td>
                                                        <td>{ format_reading(dated.entry.respiratory_rate.as_ref(), " bpm") }</td>
                                                        <td>{ format_reading(dated.entry.temperature.as_ref(), "°F") }</td>
                                                    </tr>
                                                }
                                            })
                                        }
                                    </tbody>
                                </table>
                            }
                        }
                    }
                    {
                        if ordered.skipped.is_empty() {
                            Html::default()
                        } else {
                            html! {
                                <p class="history-skipped">
                                    { format!("{} entries with unrecognized dates are not shown.", ordered.skipped.len()) }
                                </p>
                            }
                        }
                    }
                </section>
                <section class="dashboard-card">
                    <h2>{"Lab Results"}</h2>
                    { render_lab_results(&view.lab_results) }
                </section>
                <section class="dashboard-card">
                    <h2>{"Diagnostic List"}</h2>
                    { render_diagnostics(&view.diagnostics) }
                </section>
            </div>
        }
    }

    fn render_blood_pressure_chart(series: &BloodPressureSeries) -> Html {
        if !series.has_data() {
            return html! { <p class="chart-empty">{"No blood pressure data available"}</p> };
        }

        let systolic = series.systolic();
        let diastolic = series.diastolic();
        let scale = ChartScale::fitting(systolic.iter().chain(diastolic.iter()).flatten().copied());
        let count = series.points.len();

        html! {
            <svg class="bp-chart" viewBox={scale.view_box()} role="img" aria-label="Blood pressure history">
                {
                    for scale.ticks().into_iter().map(|(value, y)| html! {
                        <g>
                            <line
                                class="bp-grid"
                                x1={scale.plot_left().to_string()}
                                x2={scale.plot_right().to_string()}
                                y1={format!("{y:.1}")}
                                y2={format!("{y:.1}")}
                            />
                            <text class="bp-tick" x="4" y={format!("{:.1}", y + 4.0)}>{ format!("{value:.0}") }</text>
                        </g>
                    })
                }
                { render_series(&systolic, &scale, "systolic") }
                { render_series(&diastolic, &scale, "diastolic") }
                {
                    for series.points.iter().enumerate().map(|(index, point)| html! {
                        <text
                            class="bp-label"
                            x={format!("{:.1}", scale.x(index, count))}
                            y={format!("{:.1}", scale.label_baseline())}
                            text-anchor="middle"
                        >
                            { point.label.clone() }
                        </text>
                    })
                }
            </svg>
        }
    }

    fn render_series(values: &[Option<f64>], scale: &ChartScale, class: &'static str) -> Html {
        html! {
            <g>
                {
                    for chart::line_segments(values, scale).into_iter().map(|path| html! {
                        <path class={classes!("bp-line", class)} d={path} />
                    })
                }
                {
                    for chart::markers(values, scale).into_iter().map(|(x, y)| html! {
                        <circle
                            class={classes!("bp-marker", class)}
                            cx={format!("{x:.1}")}
                            cy={format!("{y:.1}")}
                            r="5"
                        />
                    })
                }
            </g>
        }
    }

    fn render_blood_pressure_legend(summary: &BloodPressureSummary) -> Html {
        html! {
            <div class="bp-legend">
                { render_legend_item("Systolic", "systolic", summary.systolic.as_ref()) }
                { render_legend_item("Diastolic", "diastolic", summary.diastolic.as_ref()) }
            </div>
        }
    }

    fn render_legend_item(title: &str, class: &'static str, reading: Option<&Reading>) -> Html {
        let level = reading
            .and_then(|reading| reading.level.as_deref())
            .map(|level| format!("{}{level}", level_marker(level)))
            .unwrap_or_default();

        html! {
            <div class={classes!("bp-legend-item", class)}>
                <span>{ title.to_string() }</span>
                <div class="bp-legend-value">{ format_reading(reading, "") }</div>
                <span>{ level }</span>
            </div>
        }
    }

    fn level_marker(level: &str) -> &'static str {
        if level.starts_with("Higher") {
            "▲ "
        } else if level.starts_with("Lower") {
            "▼ "
        } else {
            ""
        }
    }

    fn render_vital_card(card: &VitalCard) -> Html {
        html! {
            <article
                class={classes!("vital-card", card.placeholder.then_some("is-placeholder"))}
                data-kind={vital_kind_key(card.kind)}
            >
                <span>{ card.title.clone() }</span>
                <div class="vital-value">{ card.value.clone() }</div>
                <span>{ card.level.clone() }</span>
            </article>
        }
    }

    fn vital_kind_key(kind: VitalKind) -> &'static str {
        match kind {
            VitalKind::RespiratoryRate => "respiratory_rate",
            VitalKind::Temperature => "temperature",
            VitalKind::HeartRate => "heart_rate",
        }
    }

    fn render_profile_field(field: &ProfileField) -> Html {
        let icon = match field.kind {
            ProfileFieldKind::DateOfBirth => "📅",
            ProfileFieldKind::Gender => "👤",
            ProfileFieldKind::ContactInfo => "📞",
            ProfileFieldKind::EmergencyContact => "⚠️",
            ProfileFieldKind::Insurance => "🛡️",
        };

        html! {
            <li>
                <span aria-hidden="true">{ icon }</span>
                <span class="profile-label">{ field.label.clone() }</span>
                <span>{ field.value.clone() }</span>
            </li>
        }
    }

    fn render_lab_results(rows: &[LabResultRow]) -> Html {
        if rows.is_empty() {
            return html! { <p class="section-empty">{"No lab results available"}</p> };
        }

        html! {
            <ul class="lab-list">
                {
                    for rows.iter().map(|row| html! {
                        <li>
                            <span>{ row.name.clone() }</span>
                            <span aria-hidden="true">{"↓"}</span>
                        </li>
                    })
                }
            </ul>
        }
    }

    fn render_diagnostics(rows: &[DiagnosticRow]) -> Html {
        if rows.is_empty() {
            return html! { <p class="section-empty">{"No diagnostics recorded"}</p> };
        }

        html! {
            <table class="diagnostic-table">
                <thead>
                    <tr>
                        <th>{"Problem/Diagnosis"}</th>
                        <th>{"Description"}</th>
                        <th>{"Status"}</th>
                    </tr>
                </thead>
                <tbody>
                    {
                        for rows.iter().map(|row| html! {
                            <tr>
                                <td>{ row.name.clone() }</td>
                                <td>{ row.description.clone() }</td>
                                <td>
                                    <span class="status-chip" data-style={row.style.as_str()}>
                                        { row.status.clone() }
                                    </span>
                                </td>
                            </tr>
                        })
                    }
                </tbody>
            </table>
        }
    }

    fn format_reading(reading: Option<&Reading>, unit: &str) -> String {
        match reading {
            Some(reading) if reading.value.fract() == 0.0 => format!("{:.0}{unit}", reading.value),
            Some(reading) => format!("{}{unit}", reading.value),
            None => "--".to_string(),
        }
    }

    #[wasm_bindgen]
    pub fn mount_dashboard(selector: &str, options: JsValue) -> Result<(), JsValue> {
        let window: Window = web_sys::window().ok_or_else(|| JsValue::from_str("No window available"))?;
        let document: Document = window
            .document()
            .ok_or_else(|| JsValue::from_str("Cannot access document"))?;

        let target: Element = document
            .query_selector(selector)
            .map_err(|err| JsValue::from_str(&format!("Invalid selector: {err:?}")))?
            .ok_or_else(|| JsValue::from_str("No element matches the selector"))?;

        let options: MountOptions = if options.is_undefined() || options.is_null() {
            MountOptions::default()
        } else {
            from_value(options)?
        };

        let path = window.location().pathname()?;
        let props = options.into_props(Route::parse(&path));

        yew::Renderer::<DashboardApp>::with_root_and_props(target, props).render();
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
pub use wasm_ui::mount_dashboard;

#[cfg(not(target_arch = "wasm32"))]
pub fn mount_dashboard(_: &str, _: wasm_bindgen::JsValue) -> Result<(), wasm_bindgen::JsValue> {
    Err(wasm_bindgen::JsValue::from_str(
        "dashboard-ui only supports the wasm32 target",
    ))
}
