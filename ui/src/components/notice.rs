use leptos::prelude::*;

/// Success and error banners for a page
#[derive(Clone, Copy)]
pub struct Notice {
    success: RwSignal<Option<String>>,
    error: RwSignal<Option<String>>,
}

impl Notice {
    pub fn new() -> Self {
        Self {
            success: RwSignal::new(None),
            error: RwSignal::new(None),
        }
    }

    /// Show a success message for three seconds
    pub fn success(&self, message: String) {
        self.error.set(None);
        self.success.set(Some(message));
        let success = self.success;
        let handle = gloo_timers::callback::Timeout::new(3000, move || {
            success.set(None);
        });
        handle.forget();
    }

    pub fn error(&self, message: String) {
        log::error!("{}", message);
        self.success.set(None);
        self.error.set(Some(message));
    }

    pub fn clear(&self) {
        self.success.set(None);
        self.error.set(None);
    }
}

#[component]
pub fn NoticeBanner(notice: Notice) -> impl IntoView {
    view! {
        {move || notice.success.get().map(|msg| view! {
            <div class="mb-4 p-3 bg-green-50 border border-green-200 rounded text-green-800 text-sm">
                {msg}
            </div>
        })}
        {move || notice.error.get().map(|e| view! {
            <div class="mb-4 p-3 bg-red-50 border border-red-200 rounded text-red-800 text-sm">
                {e}
            </div>
        })}
    }
}
