use orrery_engine::{
    EngineContext, EngineError, FramePlan, Game, GameConfig, InputEvent, InputQueue, ResourceSet,
};

/// Generic game runner that wires up the engine loop.
///
/// Owns the game, its context and the input queue. The window layer feeds it
/// input and wall-clock time; it hands back the frame plan to draw. Nothing
/// here touches the GPU, so the loop itself is testable.
pub struct GameRunner<G: Game> {
    game: G,
    ctx: EngineContext,
    input: InputQueue,
    plan: FramePlan,
    config: GameConfig,
    initialized: bool,
}

impl<G: Game> GameRunner<G> {
    pub fn new(game: G) -> Self {
        let config = game.config();
        Self {
            game,
            ctx: EngineContext::new(&config),
            input: InputQueue::new(),
            plan: FramePlan::new(),
            config,
            initialized: false,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Resources the backend must create before the first frame.
    pub fn resources(&self) -> Result<ResourceSet, EngineError> {
        self.game.resources()
    }

    /// Initialize the game. `now` is seconds since startup; the clock is
    /// moved there first so the game sees the real startup time.
    pub fn init(&mut self, now: f32) {
        self.ctx.clock.advance(now);
        self.game.init(&mut self.ctx);
        self.initialized = true;
    }

    /// Push an input event into the queue.
    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Forget held keys, e.g. when the window loses focus.
    pub fn release_keys(&mut self) {
        self.input.release_all();
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.ctx.set_viewport(width, height);
    }

    /// Run one frame at `now` seconds: update the game, drain input and
    /// rebuild the frame plan.
    pub fn tick(&mut self, now: f32) -> &FramePlan {
        if !self.initialized {
            return &self.plan;
        }

        self.ctx.clock.advance(now);
        self.game.update(&mut self.ctx, &self.input);

        // Drain input after update
        self.input.drain();

        self.plan.clear();
        self.game.render(&self.ctx, &mut self.plan);
        &self.plan
    }

    pub fn plan(&self) -> &FramePlan {
        &self.plan
    }

    pub fn context(&self) -> &EngineContext {
        &self.ctx
    }

    pub fn close_requested(&self) -> bool {
        self.ctx.close_requested()
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }
}
