pub mod app;
pub mod navigation_prompt;
pub mod notice_toast;
pub mod countdown_badge;

pub use app::App;
pub use navigation_prompt::NavigationPrompt;
pub use notice_toast::NoticeToast;
pub use countdown_badge::CountdownBadge;
