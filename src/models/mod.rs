// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    AccountStatus, Admin, Alumni, Comment, Connection, ConnectionDecision, ConnectionRequestView,
    ConnectionStatus, ConnectedAlumniView, ConnectedStudentView, Credentials, InitiatedBy,
    InvitationStatus, Message, MessageType, NewNotification, Notification, NotificationType,
    ParticipantType, PlatformStats, Post, PostType, Role, Student,
};
pub use requests::{
    CommentRequest, CreateConnectionRequest, CreatePostRequest, ExploreQuery, LikeRequest,
    LoginRequest, MatchesQuery, NewMessage, NewPost, RegisterAdminRequest, RegisterAlumniRequest,
    RegisterStudentRequest, SendMessageRequest, UpdateAlumniRequest, UpdatePostRequest,
    UpdateStudentRequest,
};
pub use responses::{
    AccountEnvelope, AccountSummary, AlumniMatch, AuthResponse, ErrorResponse, HealthResponse,
    MatchesResponse, StudentMatch,
};
