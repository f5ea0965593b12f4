use leptos::prelude::*;
use spark::forms::StepStatus;

use super::context::use_multi_step;

/// Numbered step list plus the current step's title and description
#[component]
pub fn WizardProgress() -> impl IntoView {
    let form = use_multi_step();

    let steps = move || {
        form.with(|f| f.progress())
            .into_iter()
            .map(|step| {
                let (badge, text) = match step.status {
                    StepStatus::Complete => ("bg-green-600 text-white", "text-gray-700"),
                    StepStatus::Current => ("bg-blue-600 text-white", "text-blue-700 font-semibold"),
                    StepStatus::Upcoming => ("bg-gray-200 text-gray-600", "text-gray-400"),
                };
                view! {
                    <li class="flex items-center gap-2">
                        <span class=format!("w-6 h-6 rounded-full flex items-center justify-center text-xs {}", badge)>
                            {if step.status == StepStatus::Complete {
                                "✓".to_string()
                            } else {
                                (step.index + 1).to_string()
                            }}
                        </span>
                        <span class=format!("text-sm {}", text)>{step.title}</span>
                    </li>
                }
            })
            .collect::<Vec<_>>()
    };

    let heading = move || {
        form.with(|f| {
            let step = f.current_step_definition();
            (
                format!("Step {} of {}: {}", f.current_step() + 1, f.total_steps(), step.title),
                step.description.clone(),
            )
        })
    };

    view! {
        <div class="mb-6">
            <ol class="flex gap-6 mb-4">{steps}</ol>
            {move || {
                let (title, description) = heading();
                view! {
                    <div>
                        <h3 class="text-lg font-medium text-gray-900">{title}</h3>
                        {description.map(|d| view! { <p class="text-sm text-gray-500">{d}</p> })}
                    </div>
                }
            }}
        </div>
    }
}
