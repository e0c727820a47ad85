mod signin;
pub use signin::SignIn;

mod error;
pub use error::ErrorPage;

mod protected;
pub use protected::Protected;
